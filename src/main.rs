mod core;
mod decoder;
mod renderer;
mod shared;
mod utils;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::core::config::{AppConfig, Overrides};
use crate::renderer::cell::RgbColor;
use crate::utils::platform::TerminalInfo;

#[derive(Parser)]
#[command(author, version, about = "Play a video as chroma-keyed character art in the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a video file in the terminal (press q or Esc to stop)
    Play(PlayArgs),
    /// Print terminal capabilities as JSON
    Detect,
    /// Query the terminal size as crossterm sees it
    TerminalSize,
}

#[derive(Args)]
struct PlayArgs {
    /// Video file; falls back to the config file, then to video.mp4
    video: Option<PathBuf>,
    /// JSON config file (default: ./chromascii.json, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Audio file played alongside the video
    #[arg(short, long)]
    audio: Option<PathBuf>,
    /// Render grid width in cells
    #[arg(short, long)]
    width: Option<u16>,
    /// Render grid height in cells
    #[arg(short = 'H', long)]
    height: Option<u16>,
    /// Background color to key out, as r,g,b or #rrggbb
    #[arg(short = 'k', long)]
    key_color: Option<RgbColor>,
    /// Distance from the key color below which a cell is blanked
    #[arg(short = 't', long)]
    key_threshold: Option<f64>,
    /// Glyphs repeated across each row
    #[arg(short, long)]
    pattern: Option<String>,
    /// Brightness gain applied to every channel
    #[arg(short, long, allow_negative_numbers = true)]
    gain: Option<f32>,
    /// Brightness offset added after the gain
    #[arg(short, long, allow_negative_numbers = true)]
    offset: Option<f32>,
}

impl From<PlayArgs> for Overrides {
    fn from(args: PlayArgs) -> Self {
        Overrides {
            video: args.video,
            audio: args.audio,
            width: args.width,
            height: args.height,
            key_color: args.key_color,
            key_threshold: args.key_threshold,
            pattern: args.pattern,
            gain: args.gain,
            offset: args.offset,
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Play(args) => {
            let config = AppConfig::load(args.config.as_deref())?.apply(args.into())?;
            crate::core::launcher::run(&config)?;
        }
        Commands::Detect => {
            let info = TerminalInfo::detect()?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Commands::TerminalSize => {
            let (cols, rows) = crossterm::terminal::size()?;
            println!("{}x{}", cols, rows);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    if let Ok(dir) = std::env::current_dir() {
        crate::utils::logger::init(&dir);
    }

    // A previous crash may have left the terminal in raw mode.
    let _ = crossterm::terminal::disable_raw_mode();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            crate::utils::logger::error(&format!("{:?}", e));
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn play_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "chromascii",
            "play",
            "clip.mp4",
            "-w",
            "120",
            "-H",
            "40",
            "--key-color",
            "#0000ff",
            "--offset",
            "-10",
        ])
        .unwrap();
        let Commands::Play(args) = cli.command else {
            panic!("expected play");
        };
        let overrides: Overrides = args.into();
        assert_eq!(overrides.video, Some(PathBuf::from("clip.mp4")));
        assert_eq!(overrides.width, Some(120));
        assert_eq!(overrides.height, Some(40));
        assert_eq!(overrides.key_color, Some(RgbColor(0, 0, 255)));
        assert_eq!(overrides.offset, Some(-10.0));
        assert_eq!(overrides.gain, None);
    }

    #[test]
    fn bad_key_color_is_a_parse_error() {
        assert!(Cli::try_parse_from(["chromascii", "play", "--key-color", "green"]).is_err());
    }
}
