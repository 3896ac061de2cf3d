use anyhow::{Context, Result};
use std::thread;
use std::time::{Duration, Instant};

use super::input::QuitSignal;
use crate::decoder::{FrameSource, SourceEvent};
use crate::renderer::{render_frame, RenderConfig, Surface};
use crate::shared::constants;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Running,
    Eof,
    UserQuit,
}

#[derive(Clone, Copy, Debug)]
pub struct PlaybackSummary {
    pub end: PlaybackState,
    pub frames_rendered: u64,
    pub elapsed: Duration,
}

/// Pulls frames until end of stream or a quit request.
///
/// Each frame is transformed, presented, then held for its presentation
/// delay before the quit signal is checked. A source with nothing ready
/// is polled every 10ms with no timeout.
pub fn play<S, D, Q>(
    config: &RenderConfig,
    source: &mut S,
    surface: &mut D,
    quit: &mut Q,
) -> Result<PlaybackSummary>
where
    S: FrameSource,
    D: Surface,
    Q: QuitSignal,
{
    let start_time = Instant::now();
    let mut frames_rendered = 0u64;
    let mut state = PlaybackState::Running;

    crate::utils::logger::debug("Starting render loop");

    while state == PlaybackState::Running {
        match source.next_event().context("failed to read next frame")? {
            SourceEvent::Frame { frame, delay } => {
                let frame_start = Instant::now();
                let grid = render_frame(config, &frame)?;
                surface.present(&grid)?;
                frames_rendered += 1;

                let render_time = frame_start.elapsed();
                if render_time > delay && !delay.is_zero() {
                    crate::utils::logger::debug(&format!(
                        "SLOW FRAME {}: render={}us budget={}us",
                        frames_rendered,
                        render_time.as_micros(),
                        delay.as_micros()
                    ));
                }

                if !delay.is_zero() {
                    thread::sleep(delay);
                }
            }
            SourceEvent::Pending => {
                thread::sleep(constants::PENDING_POLL_INTERVAL);
            }
            SourceEvent::Eof => {
                state = PlaybackState::Eof;
                continue;
            }
        }

        if quit.quit_requested()? {
            state = PlaybackState::UserQuit;
        }
    }

    let summary = PlaybackSummary {
        end: state,
        frames_rendered,
        elapsed: start_time.elapsed(),
    };
    crate::utils::logger::debug(&format!("Render loop ended: {:?}", summary));
    Ok(summary)
}
