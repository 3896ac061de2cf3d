use anyhow::Result;
use serde::Serialize;
use std::env;
use std::io::{self, IsTerminal};

use crate::shared::constants;

/// Whether the attached terminal can show the indexed-color mosaic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ColorSupport {
    Supported { colors: u16 },
    Unsupported { reason: String },
}

impl ColorSupport {
    /// Decides support from already-gathered facts about the environment.
    pub fn assess(is_tty: bool, term: Option<&str>, no_color: bool, colors: u16) -> Self {
        if !is_tty {
            return ColorSupport::Unsupported {
                reason: "standard output is not a terminal".to_string(),
            };
        }
        match term.map(str::trim) {
            None | Some("") => {
                return ColorSupport::Unsupported {
                    reason: "TERM is not set".to_string(),
                }
            }
            Some("dumb") => {
                return ColorSupport::Unsupported {
                    reason: "the terminal does not support colors (TERM=dumb)".to_string(),
                }
            }
            Some(_) => {}
        }
        if no_color {
            return ColorSupport::Unsupported {
                reason: "colors are disabled (NO_COLOR is set)".to_string(),
            };
        }
        ColorSupport::Supported { colors }
    }
}

#[derive(Debug, Serialize)]
pub struct TerminalInfo {
    pub os_name: String,
    pub arch: String,
    pub term: Option<String>,
    pub colorterm: Option<String>,
    pub columns: u16,
    pub rows: u16,
    pub is_tty: bool,
    pub color_count: u16,
    pub color_support: ColorSupport,
}

impl TerminalInfo {
    pub fn detect() -> Result<Self> {
        let is_tty = io::stdout().is_terminal();
        let (columns, rows) = if is_tty {
            crossterm::terminal::size()?
        } else {
            (0, 0)
        };
        let term = env::var("TERM").ok();
        let no_color = env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        let color_count = crossterm::style::available_color_count();
        let color_support = ColorSupport::assess(is_tty, term.as_deref(), no_color, color_count);

        if let ColorSupport::Supported { colors } = color_support {
            if colors < constants::PALETTE_SIZE {
                crate::utils::logger::info(&format!(
                    "TERM advertises {} colors; drawing with the {}-color palette anyway",
                    colors,
                    constants::PALETTE_SIZE
                ));
            }
        }

        Ok(Self {
            os_name: env::consts::OS.to_string(),
            arch: env::consts::ARCH.to_string(),
            term,
            colorterm: env::var("COLORTERM").ok(),
            columns,
            rows,
            is_tty,
            color_count,
            color_support,
        })
    }
}
