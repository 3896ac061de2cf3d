use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Soundtrack played alongside the picture. Dropping it stops playback.
pub struct AudioManager {
    _stream: OutputStream,
    sink: Sink,
}

impl AudioManager {
    pub fn start(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open audio file: {}", path.display()))?;
        let source = Decoder::new(BufReader::new(file))
            .with_context(|| format!("failed to decode audio: {}", path.display()))?;

        let (_stream, stream_handle) =
            OutputStream::try_default().context("no audio output device found")?;
        let sink = Sink::try_new(&stream_handle).context("failed to create audio sink")?;
        sink.append(source);
        sink.play();

        Ok(Self { _stream, sink })
    }

    /// Audio is optional: any failure is logged and playback goes on silent.
    pub fn start_optional(path: Option<&Path>) -> Option<Self> {
        let path = path?;
        match Self::start(path) {
            Ok(audio) => {
                crate::utils::logger::info(&format!("Playing audio from {}", path.display()));
                Some(audio)
            }
            Err(e) => {
                crate::utils::logger::error(&format!("Audio disabled: {:#}", e));
                None
            }
        }
    }
}

impl Drop for AudioManager {
    fn drop(&mut self) {
        self.sink.stop();
    }
}
