//! Chroma keying and 256-color quantization.

use serde::{Deserialize, Serialize};

use super::cell::RgbColor;
use crate::shared::constants;

/// First palette slot of the 6x6x6 color cube; slots 0-15 are system colors.
const CUBE_BASE: u32 = 16;
const CUBE_LEVELS: u32 = 6;

/// Cells within `threshold` (Euclidean, exclusive) of `color` are background.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromaKey {
    pub color: RgbColor,
    pub threshold: f64,
}

impl Default for ChromaKey {
    fn default() -> Self {
        let (r, g, b) = constants::DEFAULT_KEY_COLOR;
        Self {
            color: RgbColor(r, g, b),
            threshold: constants::DEFAULT_KEY_THRESHOLD,
        }
    }
}

impl ChromaKey {
    pub fn distance_sq(&self, px: RgbColor) -> u32 {
        let dr = px.0 as i32 - self.color.0 as i32;
        let dg = px.1 as i32 - self.color.1 as i32;
        let db = px.2 as i32 - self.color.2 as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    pub fn is_background(&self, px: RgbColor) -> bool {
        (self.distance_sq(px) as f64) < self.threshold * self.threshold
    }
}

/// Maps a color into the 6x6x6 cube of the 256-color palette.
///
/// Never reaches the grayscale ramp (232-255).
pub fn quantize_256(px: RgbColor) -> u8 {
    let level = |c: u8| c as u32 * CUBE_LEVELS / 256;
    let index = CUBE_BASE + 36 * level(px.0) + 6 * level(px.1) + level(px.2);
    index.min(255) as u8
}
