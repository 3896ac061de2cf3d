use anyhow::{bail, Result};

use crate::renderer::cell::RgbColor;

/// Packed RGB24 frame, row-major, three bytes per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub buffer: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn new(buffer: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if buffer.len() != expected {
            bail!(
                "frame buffer holds {} bytes, expected {} for {}x{} RGB",
                buffer.len(),
                expected,
                width,
                height
            );
        }
        Ok(Self { buffer, width, height })
    }

    pub fn solid(width: u32, height: u32, color: RgbColor) -> Self {
        let mut buffer = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..width as usize * height as usize {
            buffer.extend_from_slice(&[color.0, color.1, color.2]);
        }
        Self { buffer, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel(&self, x: u32, y: u32) -> RgbColor {
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        RgbColor(
            self.buffer[offset],
            self.buffer[offset + 1],
            self.buffer[offset + 2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(Frame::new(vec![0; 5], 1, 2).is_err());
        assert!(Frame::new(vec![0; 6], 1, 2).is_ok());
    }

    #[test]
    fn pixel_reads_row_major() {
        let frame = Frame::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12], 2, 2).unwrap();
        assert_eq!(frame.pixel(1, 0), RgbColor(4, 5, 6));
        assert_eq!(frame.pixel(0, 1), RgbColor(7, 8, 9));
    }
}
