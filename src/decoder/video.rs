use anyhow::{anyhow, bail, Context, Result};
use opencv::{imgproc, prelude::*, videoio};
use std::path::Path;
use std::time::Duration;

use super::frame::Frame;
use super::source::{FrameSource, SourceEvent};
use crate::shared::constants;

/// Decodes a local video file through OpenCV, one RGB frame per read.
///
/// The capture handle is released on drop, so every exit path of the
/// playback loop gives the file back.
pub struct VideoDecoder {
    capture: videoio::VideoCapture,
    frame_interval: Duration,
    last_position_ms: Option<f64>,
    frames_read: u64,
}

impl VideoDecoder {
    pub fn open(path: &Path) -> Result<Self> {
        let path_str = path
            .to_str()
            .ok_or_else(|| anyhow!("video path is not valid UTF-8: {}", path.display()))?;
        if !path.is_file() {
            bail!("video file not found: {}", path.display());
        }

        crate::utils::logger::debug(&format!("Opening video with OpenCV: {}", path.display()));

        // CAP_ANY lets OpenCV pick the platform backend.
        let capture = videoio::VideoCapture::from_file(path_str, videoio::CAP_ANY)
            .with_context(|| format!("failed to create capture for {}", path.display()))?;

        if !capture.is_opened()? {
            let err_msg = format!("failed to open video file: {}", path.display());
            crate::utils::logger::error(&err_msg);
            return Err(anyhow!(err_msg));
        }

        let fps = capture.get(videoio::CAP_PROP_FPS)?;
        let orig_width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let orig_height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        let frame_interval = frame_interval(fps);

        crate::utils::logger::info(&format!(
            "Video opened: {}x{} @ {:.3} fps (interval {:?})",
            orig_width, orig_height, fps, frame_interval
        ));

        Ok(Self {
            capture,
            frame_interval,
            last_position_ms: None,
            frames_read: 0,
        })
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    fn read_frame(&mut self) -> Result<Option<(Frame, Duration)>> {
        let mut bgr = Mat::default();
        if !self.capture.read(&mut bgr)? || bgr.empty() {
            return Ok(None);
        }

        let position_ms = self.capture.get(videoio::CAP_PROP_POS_MSEC)?;
        let delay = presentation_delay(self.last_position_ms, position_ms, self.frame_interval);
        self.last_position_ms = Some(position_ms);

        let mut rgb = Mat::default();
        imgproc::cvt_color_def(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB)?;
        if !rgb.is_continuous() {
            bail!("decoded frame is not continuous");
        }

        let width = rgb.cols() as u32;
        let height = rgb.rows() as u32;
        let frame = Frame::new(rgb.data_bytes()?.to_vec(), width, height)?;
        self.frames_read += 1;

        Ok(Some((frame, delay)))
    }
}

impl FrameSource for VideoDecoder {
    fn next_event(&mut self) -> Result<SourceEvent> {
        match self.read_frame()? {
            Some((frame, delay)) => Ok(SourceEvent::Frame { frame, delay }),
            None => {
                crate::utils::logger::debug(&format!(
                    "Decoder EOF after {} frames",
                    self.frames_read
                ));
                Ok(SourceEvent::Eof)
            }
        }
    }
}

impl Drop for VideoDecoder {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            crate::utils::logger::error(&format!("Failed to release video capture: {}", e));
        }
    }
}

/// Nominal time between frames, falling back when the container reports no rate.
fn frame_interval(fps: f64) -> Duration {
    let fps = if fps.is_finite() && fps > 0.0 {
        fps
    } else {
        constants::FALLBACK_FPS
    };
    Duration::from_secs_f64(1.0 / fps)
}

/// Uses the stream-position delta when the container gives a sane one.
fn presentation_delay(previous_ms: Option<f64>, current_ms: f64, nominal: Duration) -> Duration {
    match previous_ms {
        Some(previous) if current_ms.is_finite() && current_ms > previous => {
            Duration::from_secs_f64((current_ms - previous) / 1000.0)
        }
        _ => nominal,
    }
}
