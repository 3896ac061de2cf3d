use anyhow::{bail, Context, Result};
use opencv::{core::Size, imgproc, prelude::*};

use crate::decoder::Frame;

/// Area-averaging resize of `frame` to exactly `width` x `height`.
///
/// Each destination cell weighs the source pixels by how much of them it
/// covers (OpenCV `INTER_AREA`). Aspect ratio is not preserved. An empty
/// source or target is an input error, not something playback can recover from.
pub fn resample(frame: &Frame, width: u32, height: u32) -> Result<Frame> {
    if frame.is_empty() {
        bail!("cannot resample an empty {}x{} frame", frame.width, frame.height);
    }
    if width == 0 || height == 0 {
        bail!("cannot resample to an empty {}x{} grid", width, height);
    }
    if frame.width == width && frame.height == height {
        return Ok(frame.clone());
    }

    // Borrow the packed bytes as a single row, then view them as HxW with 3 channels.
    let flat = Mat::from_slice(&frame.buffer).context("failed to wrap source frame")?;
    let src = flat
        .reshape(3, frame.height as i32)
        .context("source frame does not match its declared size")?;

    let mut dst = Mat::default();
    imgproc::resize(
        &*src,
        &mut dst,
        Size::new(width as i32, height as i32),
        0.0,
        0.0,
        imgproc::INTER_AREA,
    )
    .context("area resize failed")?;

    if !dst.is_continuous() {
        bail!("resized frame is not continuous");
    }
    Frame::new(dst.data_bytes()?.to_vec(), width, height)
}
