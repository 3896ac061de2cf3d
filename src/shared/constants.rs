use std::time::Duration;

pub const APP_NAME: &str = "chromascii";

pub const CONFIG_FILE: &str = "chromascii.json";
pub const CONFIG_DIR_FILE: &str = "config.json";
pub const ERROR_LOG_FILE: &str = "chromascii-error.log";
pub const DEBUG_LOG_FILE: &str = "chromascii-debug.log";

pub const DEFAULT_VIDEO_PATH: &str = "video.mp4";

pub const DEFAULT_WIDTH: u16 = 90;
pub const DEFAULT_HEIGHT: u16 = 45;
pub const DEFAULT_KEY_COLOR: (u8, u8, u8) = (0, 255, 0);
pub const DEFAULT_KEY_THRESHOLD: f64 = 70.0;
pub const DEFAULT_GLYPH_PATTERN: &str = "OIA";
pub const DEFAULT_GAIN: f32 = 1.2;
pub const DEFAULT_OFFSET: f32 = 20.0;

/// Sleep between polls while the frame source has nothing ready.
pub const PENDING_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Used when the container reports no usable frame rate.
pub const FALLBACK_FPS: f64 = 30.0;

pub const PALETTE_SIZE: u16 = 256;
