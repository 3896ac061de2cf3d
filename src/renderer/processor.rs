use anyhow::Result;
use rayon::prelude::*;

use super::cell::{CellData, CellGrid, ColorPair, RgbColor};
use super::config::RenderConfig;
use super::palette::quantize_256;
use super::resampler;
use crate::decoder::Frame;

/// Full per-frame transform: resample to the grid, adjust brightness, map cells.
///
/// Pure over its inputs; nothing carries over between frames.
pub fn render_frame(config: &RenderConfig, frame: &Frame) -> Result<CellGrid> {
    let mut resized = resampler::resample(frame, config.width as u32, config.height as u32)?;
    config.brightness.apply_to_frame(&mut resized);
    Ok(map_cells(config, &resized))
}

/// Classifies every pixel of an already-resized frame into a cell.
pub fn map_cells(config: &RenderConfig, frame: &Frame) -> CellGrid {
    let width = frame.width as usize;
    let height = frame.height as usize;
    let mut grid = CellGrid::blank(width, height);
    if width == 0 {
        return grid;
    }

    grid.cells
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = map_pixel(config, frame.pixel(x as u32, y as u32), x);
            }
        });

    grid
}

fn map_pixel(config: &RenderConfig, px: RgbColor, x: usize) -> CellData {
    if config.chroma_key.is_background(px) {
        return CellData::BLANK;
    }
    CellData {
        glyph: config.pattern.glyph_at(x),
        pair: ColorPair::for_palette(quantize_256(px)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::config::GlyphPattern;

    fn identity_config(width: u16, height: u16) -> RenderConfig {
        let mut config = RenderConfig {
            width,
            height,
            ..RenderConfig::default()
        };
        config.brightness.gain = 1.0;
        config.brightness.offset = 0.0;
        config
    }

    #[test]
    fn solid_green_renders_all_blank() {
        for (w, h) in [(90, 45), (1, 1), (17, 3)] {
            let config = RenderConfig {
                width: w,
                height: h,
                ..RenderConfig::default()
            };
            let frame = Frame::solid(320, 240, RgbColor(0, 255, 0));
            let grid = render_frame(&config, &frame).unwrap();
            assert_eq!((grid.width, grid.height), (w as usize, h as usize));
            assert!(grid.cells.iter().all(|c| *c == CellData::BLANK));
            assert!(grid.cells.iter().all(|c| c.pair == ColorPair::DEFAULT));
        }
    }

    #[test]
    fn grid_size_ignores_source_aspect() {
        let config = RenderConfig::default();
        let tall = Frame::solid(9, 400, RgbColor(255, 0, 0));
        let grid = render_frame(&config, &tall).unwrap();
        assert_eq!((grid.width, grid.height), (90, 45));
    }

    #[test]
    fn glyphs_stripe_by_column() {
        let config = identity_config(9, 2);
        let frame = Frame::solid(9, 2, RgbColor(255, 0, 0));
        let grid = map_cells(&config, &frame);
        let first_row: String = grid.cells[..9].iter().map(|c| c.glyph).collect();
        assert_eq!(first_row, "OIAOIAOIA");
        for y in 0..2 {
            for x in 0..6 {
                let at = |x: usize| grid.cells[y * grid.width + x].glyph;
                assert_eq!(at(x), at(x + 3));
            }
        }
    }

    #[test]
    fn glyph_ignores_brightness() {
        let config = identity_config(2, 1);
        let frame = Frame::new(vec![10, 10, 10, 250, 250, 250], 2, 1).unwrap();
        let dark_then_light = map_cells(&config, &frame);
        let frame = Frame::new(vec![250, 250, 250, 10, 10, 10], 2, 1).unwrap();
        let light_then_dark = map_cells(&config, &frame);
        assert_eq!(dark_then_light.cells[0].glyph, light_then_dark.cells[0].glyph);
        assert_eq!(dark_then_light.cells[1].glyph, light_then_dark.cells[1].glyph);
    }

    #[test]
    fn foreground_cells_carry_palette_pair() {
        let config = identity_config(1, 1);
        let frame = Frame::solid(1, 1, RgbColor(255, 0, 0));
        let grid = map_cells(&config, &frame);
        assert_eq!(grid.cells[0].pair, ColorPair(197));
        assert_eq!(grid.cells[0].pair.palette_index(), Some(196));
    }

    #[test]
    fn brightness_runs_before_keying() {
        // (0,215,0) is 40 from green; +20 offset pushes red/blue to 20 and
        // green to 255, giving distance sqrt(800) which still keys out.
        let config = RenderConfig {
            width: 1,
            height: 1,
            ..RenderConfig::default()
        };
        let frame = Frame::solid(1, 1, RgbColor(0, 215, 0));
        assert_eq!(render_frame(&config, &frame).unwrap().cells[0], CellData::BLANK);

        // A dark pixel is lifted by the offset and shows up quantized after it.
        let frame = Frame::solid(1, 1, RgbColor(0, 0, 0));
        let cell = render_frame(&config, &frame).unwrap().cells[0];
        assert_eq!(cell.pair, ColorPair::for_palette(quantize_256(RgbColor(20, 20, 20))));
    }

    #[test]
    fn custom_pattern_and_key() {
        let mut config = identity_config(4, 1);
        config.pattern = GlyphPattern::new("#").unwrap();
        config.chroma_key.color = RgbColor(0, 0, 255);
        config.chroma_key.threshold = 10.0;
        let frame = Frame::new(vec![0, 0, 255, 0, 255, 0, 0, 0, 250, 9, 9, 9], 4, 1).unwrap();
        let grid = map_cells(&config, &frame);
        assert_eq!(grid.cells[0], CellData::BLANK);
        assert_eq!(grid.cells[1].glyph, '#');
        assert_eq!(grid.cells[2], CellData::BLANK);
        assert_eq!(grid.cells[3].glyph, '#');
    }

    #[test]
    fn empty_source_is_an_error() {
        let frame = Frame::new(Vec::new(), 0, 0).unwrap();
        assert!(render_frame(&RenderConfig::default(), &frame).is_err());
    }
}
