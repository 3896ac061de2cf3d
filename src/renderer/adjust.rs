use serde::{Deserialize, Serialize};

use crate::decoder::Frame;
use crate::shared::constants;

/// Linear brightness/contrast: `out = clamp(in * gain + offset, 0, 255)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrightnessAdjust {
    pub gain: f32,
    pub offset: f32,
}

impl Default for BrightnessAdjust {
    fn default() -> Self {
        Self {
            gain: constants::DEFAULT_GAIN,
            offset: constants::DEFAULT_OFFSET,
        }
    }
}

impl BrightnessAdjust {
    pub fn apply(&self, value: u8) -> u8 {
        // Truncates after clamping, like an f32 -> u8 cast of the clipped value.
        (value as f32 * self.gain + self.offset).clamp(0.0, 255.0) as u8
    }

    pub fn lookup_table(&self) -> [u8; 256] {
        let mut table = [0u8; 256];
        for (value, out) in table.iter_mut().enumerate() {
            *out = self.apply(value as u8);
        }
        table
    }

    /// Rewrites every channel of every pixel in place.
    pub fn apply_to_frame(&self, frame: &mut Frame) {
        if self.gain == 1.0 && self.offset == 0.0 {
            return;
        }
        let table = self.lookup_table();
        for byte in frame.buffer.iter_mut() {
            *byte = table[*byte as usize];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::cell::RgbColor;

    #[test]
    fn default_gain_clamps_high_and_lifts_black() {
        let adjust = BrightnessAdjust::default();
        assert_eq!(adjust.apply(250), 255);
        assert_eq!(adjust.apply(0), 20);
        assert_eq!(adjust.apply(100), 140);
    }

    #[test]
    fn negative_offset_clamps_at_zero() {
        let adjust = BrightnessAdjust {
            gain: 1.0,
            offset: -40.0,
        };
        assert_eq!(adjust.apply(10), 0);
        assert_eq!(adjust.apply(50), 10);
    }

    #[test]
    fn applies_per_channel_across_frame() {
        let mut frame = Frame::solid(2, 2, RgbColor(0, 250, 100));
        BrightnessAdjust::default().apply_to_frame(&mut frame);
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(frame.pixel(x, y), RgbColor(20, 255, 140));
            }
        }
    }

    #[test]
    fn identity_leaves_frame_untouched() {
        let mut frame = Frame::solid(1, 1, RgbColor(1, 2, 3));
        BrightnessAdjust {
            gain: 1.0,
            offset: 0.0,
        }
        .apply_to_frame(&mut frame);
        assert_eq!(frame.pixel(0, 0), RgbColor(1, 2, 3));
    }
}
