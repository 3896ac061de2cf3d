use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_width::UnicodeWidthChar;

use super::adjust::BrightnessAdjust;
use super::palette::ChromaKey;
use crate::shared::constants;

/// Repeating glyph sequence; never empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GlyphPattern(Vec<char>);

impl GlyphPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let glyphs: Vec<char> = pattern.chars().collect();
        if glyphs.is_empty() {
            bail!("glyph pattern must contain at least one character");
        }
        // Every glyph must fill exactly one terminal column to land on its cell.
        if let Some(c) = glyphs.iter().find(|c| c.width() != Some(1)) {
            bail!("glyph {:?} in pattern is not one column wide", c);
        }
        Ok(Self(glyphs))
    }

    /// Glyph for column `x`; depends on the column only, never on the pixel.
    pub fn glyph_at(&self, x: usize) -> char {
        self.0[x % self.0.len()]
    }

}

impl Default for GlyphPattern {
    fn default() -> Self {
        Self(constants::DEFAULT_GLYPH_PATTERN.chars().collect())
    }
}

impl TryFrom<String> for GlyphPattern {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<GlyphPattern> for String {
    fn from(pattern: GlyphPattern) -> Self {
        pattern.0.into_iter().collect()
    }
}

impl fmt::Display for GlyphPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.0 {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Immutable per-run render parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u16,
    pub height: u16,
    pub chroma_key: ChromaKey,
    pub pattern: GlyphPattern,
    pub brightness: BrightnessAdjust,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: constants::DEFAULT_WIDTH,
            height: constants::DEFAULT_HEIGHT,
            chroma_key: ChromaKey::default(),
            pattern: GlyphPattern::default(),
            brightness: BrightnessAdjust::default(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!(
                "render grid must be at least 1x1, got {}x{}",
                self.width,
                self.height
            );
        }
        let threshold = self.chroma_key.threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            bail!("chroma-key threshold must be a finite value >= 0, got {}", threshold);
        }
        if !self.brightness.gain.is_finite() || !self.brightness.offset.is_finite() {
            bail!(
                "brightness gain and offset must be finite, got {} and {}",
                self.brightness.gain,
                self.brightness.offset
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::cell::RgbColor;

    #[test]
    fn defaults_match_reference_player() {
        let config = RenderConfig::default();
        assert_eq!((config.width, config.height), (90, 45));
        assert_eq!(config.chroma_key.color, RgbColor(0, 255, 0));
        assert_eq!(config.chroma_key.threshold, 70.0);
        assert_eq!(config.pattern.to_string(), "OIA");
        assert_eq!(config.brightness.gain, 1.2);
        assert_eq!(config.brightness.offset, 20.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn pattern_repeats_by_column() {
        let pattern = GlyphPattern::new("OIA").unwrap();
        for x in 0..30 {
            assert_eq!(pattern.glyph_at(x), pattern.glyph_at(x + 3));
        }
        assert_eq!(pattern.glyph_at(4), 'I');
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert!(GlyphPattern::new("").is_err());
        assert!(GlyphPattern::new("a\nb").is_err());
        assert!(serde_json::from_str::<RenderConfig>(r#"{"pattern": ""}"#).is_err());
    }

    #[test]
    fn glyphs_must_be_one_column_wide() {
        assert!(GlyphPattern::new("O漢A").is_err());
        assert!(GlyphPattern::new("e\u{301}").is_err());
        assert!(GlyphPattern::new("▀█░").is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: RenderConfig = serde_json::from_str(
            r#"{"width": 120, "chroma_key": {"threshold": 40.5}, "pattern": "#@"}"#,
        )
        .unwrap();
        assert_eq!(config.width, 120);
        assert_eq!(config.height, 45);
        assert_eq!(config.chroma_key.threshold, 40.5);
        assert_eq!(config.chroma_key.color, RgbColor(0, 255, 0));
        assert_eq!(config.pattern.to_string(), "#@");
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut config = RenderConfig {
            width: 0,
            ..RenderConfig::default()
        };
        assert!(config.validate().is_err());

        config.width = 10;
        config.chroma_key.threshold = -1.0;
        assert!(config.validate().is_err());

        config.chroma_key.threshold = 70.0;
        config.brightness.gain = f32::NAN;
        assert!(config.validate().is_err());
    }
}
