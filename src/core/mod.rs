pub mod audio_manager;
pub mod config;
pub mod input;
pub mod launcher;
pub mod player;
