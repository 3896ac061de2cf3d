use anyhow::Result;
use std::time::Duration;

use super::frame::Frame;

/// What a frame source has for the playback loop right now.
#[derive(Debug)]
pub enum SourceEvent {
    /// A decoded frame and how long it stays on screen.
    Frame { frame: Frame, delay: Duration },
    /// Nothing decoded yet; ask again shortly.
    Pending,
    Eof,
}

pub trait FrameSource {
    fn next_event(&mut self) -> Result<SourceEvent>;
}
