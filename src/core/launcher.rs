use anyhow::{Context, Result};

use super::audio_manager::AudioManager;
use super::config::AppConfig;
use super::input::KeyboardQuit;
use super::player::{self, PlaybackState, PlaybackSummary};
use crate::decoder::VideoDecoder;
use crate::renderer::DisplayManager;
use crate::utils::platform::{ColorSupport, TerminalInfo};

/// Sets up the video, terminal and optional audio, plays, and tears down.
///
/// Returns `None` when the terminal cannot show colors; playback never starts.
pub fn run(config: &AppConfig) -> Result<Option<PlaybackSummary>> {
    config.validate()?;

    let info = TerminalInfo::detect()?;
    if let ColorSupport::Unsupported { reason } = &info.color_support {
        crate::utils::logger::info(&format!("Unsupported terminal: {}", reason));
        println!("This terminal does not support colors: {}.", reason);
        return Ok(None);
    }

    let video_path = config.video_path();
    crate::utils::logger::info(&format!(
        "launch: video={} grid={}x{} pattern={:?} key={} threshold={} gain={} offset={} audio={}",
        video_path.display(),
        config.render.width,
        config.render.height,
        config.render.pattern.to_string(),
        config.render.chroma_key.color,
        config.render.chroma_key.threshold,
        config.render.brightness.gain,
        config.render.brightness.offset,
        config
            .audio
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".to_string())
    ));

    // Opened before the terminal switches modes so errors print normally.
    let mut decoder = VideoDecoder::open(&video_path)
        .with_context(|| format!("cannot play {}", video_path.display()))?;
    let mut quit = KeyboardQuit::install()?;
    let audio = AudioManager::start_optional(config.audio.as_deref());

    let summary = {
        let mut display = DisplayManager::new()?;
        player::play(&config.render, &mut decoder, &mut display, &mut quit)
    };
    drop(audio);
    crate::utils::logger::debug(&format!("Decoder read {} frames", decoder.frames_read()));
    drop(decoder);
    let summary = summary?;

    let reason = match summary.end {
        PlaybackState::Eof => "end of video",
        PlaybackState::UserQuit => "stopped by user",
        PlaybackState::Running => "interrupted",
    };
    println!(
        "Played {} frames in {:.2}s ({}).",
        summary.frames_rendered,
        summary.elapsed.as_secs_f64(),
        reason
    );

    Ok(Some(summary))
}
