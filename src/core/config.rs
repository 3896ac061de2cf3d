use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::renderer::cell::RgbColor;
use crate::renderer::config::GlyphPattern;
use crate::renderer::RenderConfig;
use crate::shared::constants;

/// Everything a playback run needs, as read from the config file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub video: Option<PathBuf>,
    pub audio: Option<PathBuf>,
    pub render: RenderConfig,
}

/// Command-line values that take precedence over the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub video: Option<PathBuf>,
    pub audio: Option<PathBuf>,
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub key_color: Option<RgbColor>,
    pub key_threshold: Option<f64>,
    pub pattern: Option<String>,
    pub gain: Option<f32>,
    pub offset: Option<f32>,
}

impl AppConfig {
    /// Reads `explicit` if given, otherwise the first config file found in
    /// the working directory or the user config directory, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        for candidate in Self::candidates() {
            if candidate.is_file() {
                return Self::from_file(&candidate);
            }
        }
        Ok(Self::default())
    }

    fn candidates() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(constants::CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join(constants::APP_NAME).join(constants::CONFIG_DIR_FILE));
        }
        paths
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        crate::utils::logger::info(&format!("Loaded config from {}", path.display()));
        Ok(config)
    }

    pub fn apply(mut self, overrides: Overrides) -> Result<Self> {
        if overrides.video.is_some() {
            self.video = overrides.video;
        }
        if overrides.audio.is_some() {
            self.audio = overrides.audio;
        }
        let render = &mut self.render;
        if let Some(width) = overrides.width {
            render.width = width;
        }
        if let Some(height) = overrides.height {
            render.height = height;
        }
        if let Some(color) = overrides.key_color {
            render.chroma_key.color = color;
        }
        if let Some(threshold) = overrides.key_threshold {
            render.chroma_key.threshold = threshold;
        }
        if let Some(pattern) = overrides.pattern {
            render.pattern = GlyphPattern::new(&pattern)?;
        }
        if let Some(gain) = overrides.gain {
            render.brightness.gain = gain;
        }
        if let Some(offset) = overrides.offset {
            render.brightness.offset = offset;
        }
        Ok(self)
    }

    pub fn video_path(&self) -> PathBuf {
        self.video
            .clone()
            .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_VIDEO_PATH))
    }

    pub fn validate(&self) -> Result<()> {
        self.render.validate()?;
        if let Some(audio) = &self.audio {
            if audio.as_os_str().is_empty() {
                bail!("audio path is empty");
            }
        }
        Ok(())
    }
}
