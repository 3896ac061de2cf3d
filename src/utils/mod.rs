pub mod logger;
pub mod platform;
