pub mod adjust;
pub mod cell;
pub mod config;
pub mod display;
pub mod palette;
pub mod processor;
pub mod resampler;

pub use config::RenderConfig;
pub use display::{DisplayManager, Surface};
pub use processor::render_frame;
