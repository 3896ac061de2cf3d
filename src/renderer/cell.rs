use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents a 24-bit RGB color
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Accepts `r,g,b` or `#rrggbb`.
impl FromStr for RgbColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                bail!("expected #rrggbb, got {:?}", s);
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|e| anyhow!("bad hex channel in {:?}: {}", s, e))
            };
            return Ok(RgbColor(channel(0)?, channel(2)?, channel(4)?));
        }

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            bail!("expected r,g,b or #rrggbb, got {:?}", s);
        }
        let channel = |p: &str| {
            p.parse::<u8>()
                .map_err(|e| anyhow!("bad channel {:?} in {:?}: {}", p, s, e))
        };
        Ok(RgbColor(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?))
    }
}

/// Terminal color pair. Pair 0 is the unstyled default; palette index `i`
/// draws with pair `i + 1` (foreground `i` over the default background).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ColorPair(pub u16);

impl ColorPair {
    pub const DEFAULT: ColorPair = ColorPair(0);

    pub fn for_palette(index: u8) -> Self {
        ColorPair(index as u16 + 1)
    }

    pub fn palette_index(self) -> Option<u8> {
        match self.0 {
            0 => None,
            n => u8::try_from(n - 1).ok(),
        }
    }
}

/// Represents a single character cell on the terminal
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CellData {
    pub glyph: char,
    pub pair: ColorPair,
}

impl CellData {
    pub const BLANK: CellData = CellData {
        glyph: ' ',
        pair: ColorPair::DEFAULT,
    };
}

impl Default for CellData {
    fn default() -> Self {
        Self::BLANK
    }
}

/// One rendered frame at terminal cell resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct CellGrid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<CellData>,
}

impl CellGrid {
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CellData::BLANK; width * height],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_color_spellings() {
        assert_eq!("0,255,0".parse::<RgbColor>().unwrap(), RgbColor(0, 255, 0));
        assert_eq!(" 12, 34 ,56 ".parse::<RgbColor>().unwrap(), RgbColor(12, 34, 56));
        assert_eq!("#00FF7f".parse::<RgbColor>().unwrap(), RgbColor(0, 255, 127));
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!("0,256,0".parse::<RgbColor>().is_err());
        assert!("0,255".parse::<RgbColor>().is_err());
        assert!("#0f0".parse::<RgbColor>().is_err());
        assert!("#gg0000".parse::<RgbColor>().is_err());
    }

    #[test]
    fn color_pair_reserves_zero() {
        assert_eq!(ColorPair::for_palette(0), ColorPair(1));
        assert_eq!(ColorPair::for_palette(255), ColorPair(256));
        assert_eq!(ColorPair(256).palette_index(), Some(255));
        assert_eq!(ColorPair::DEFAULT.palette_index(), None);
    }

    #[test]
    fn blank_grid_is_row_major_and_unstyled() {
        let grid = CellGrid::blank(3, 2);
        assert_eq!(grid.cells.len(), 6);
        assert!(grid.cells.iter().all(|c| *c == CellData::BLANK));
        assert_eq!(CellData::default().pair, ColorPair::DEFAULT);
    }
}
