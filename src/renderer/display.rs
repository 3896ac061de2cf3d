use anyhow::{Context, Result};
use crossterm::{
    cursor,
    style::{Print, ResetColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use std::io::{self, BufWriter, Stdout, Write};

use super::cell::{CellData, CellGrid, ColorPair};

const SYNC_BEGIN: &[u8] = b"\x1b[?2026h";
const SYNC_END: &[u8] = b"\x1b[?2026l";
const AUTOWRAP_OFF: &str = "\x1b[?7l";
const AUTOWRAP_ON: &str = "\x1b[?7h";

/// Something a rendered grid can be shown on.
pub trait Surface {
    fn present(&mut self, grid: &CellGrid) -> Result<()>;
}

/// Result of encoding one grid.
pub struct EncodedFrame<'a> {
    pub bytes: &'a [u8],
    pub drawn: usize,
    /// Changed cells that fell outside the terminal and were left out.
    pub skipped: usize,
}

/// Turns cell grids into ANSI output, sending only cells that changed.
pub struct FrameEncoder {
    last_cells: Option<Vec<CellData>>,
    last_layout: (usize, usize, u16, u16),
    buffer: Vec<u8>,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameEncoder {
    pub fn new() -> Self {
        Self {
            last_cells: None,
            last_layout: (0, 0, 0, 0),
            buffer: Vec::with_capacity(256 * 1024),
        }
    }

    // Zero-allocation decimal writer
    #[inline(always)]
    fn write_decimal(buffer: &mut Vec<u8>, n: u32) {
        let mut digits = [0u8; 10];
        let mut len = 0;
        let mut n = n;
        loop {
            digits[len] = b'0' + (n % 10) as u8;
            len += 1;
            n /= 10;
            if n == 0 {
                break;
            }
        }
        buffer.extend(digits[..len].iter().rev());
    }

    fn write_pair(buffer: &mut Vec<u8>, pair: ColorPair) {
        match pair.palette_index() {
            // Foreground from the palette, background left at the terminal default.
            Some(index) => {
                buffer.extend_from_slice(b"\x1b[38;5;");
                Self::write_decimal(buffer, index as u32);
                buffer.push(b'm');
            }
            None => buffer.extend_from_slice(b"\x1b[39m"),
        }
    }

    /// Cells at or beyond `term_cols` x `term_rows` are never emitted.
    pub fn encode(&mut self, grid: &CellGrid, term_cols: u16, term_rows: u16) -> EncodedFrame<'_> {
        self.buffer.clear();
        let buffer = &mut self.buffer;
        buffer.extend_from_slice(SYNC_BEGIN);

        let layout = (grid.width, grid.height, term_cols, term_rows);
        if self.last_layout != layout {
            self.last_cells = None;
            self.last_layout = layout;
        }
        if self.last_cells.is_none() {
            // A cleared screen is all blank cells, so diffing against blanks redraws the rest.
            buffer.extend_from_slice(b"\x1b[0m\x1b[2J");
        }
        let last_cells = self
            .last_cells
            .get_or_insert_with(|| vec![CellData::BLANK; grid.cells.len()]);

        let mut last_pair: Option<ColorPair> = None;
        let mut cursor_x: i32 = -1;
        let mut cursor_y: i32 = -1;
        let mut drawn = 0;
        let mut skipped = 0;
        let width = grid.width.max(1);

        for (i, cell) in grid.cells.iter().enumerate() {
            if *cell == last_cells[i] {
                cursor_x = -1;
                continue;
            }

            let x = i % width;
            let y = i / width;
            if x >= term_cols as usize || y >= term_rows as usize {
                skipped += 1;
                cursor_x = -1;
                continue;
            }

            if cursor_x != x as i32 || cursor_y != y as i32 {
                buffer.extend_from_slice(b"\x1b[");
                Self::write_decimal(buffer, y as u32 + 1);
                buffer.push(b';');
                Self::write_decimal(buffer, x as u32 + 1);
                buffer.push(b'H');
                cursor_x = x as i32;
                cursor_y = y as i32;
            }

            if last_pair != Some(cell.pair) {
                Self::write_pair(buffer, cell.pair);
                last_pair = Some(cell.pair);
            }

            let mut utf8 = [0u8; 4];
            buffer.extend_from_slice(cell.glyph.encode_utf8(&mut utf8).as_bytes());

            last_cells[i] = *cell;
            drawn += 1;
            // Only ASCII is known to advance the cursor by exactly one column.
            if cell.glyph.is_ascii() {
                cursor_x += 1;
            } else {
                cursor_x = -1;
            }
        }

        buffer.extend_from_slice(b"\x1b[0m");
        buffer.extend_from_slice(SYNC_END);

        EncodedFrame {
            bytes: &self.buffer,
            drawn,
            skipped,
        }
    }
}

/// Owns the terminal for the lifetime of playback.
///
/// Entering sets raw mode and the alternate screen; dropping puts both back,
/// whichever way playback ends.
pub struct DisplayManager {
    stdout: BufWriter<Stdout>,
    encoder: FrameEncoder,
    reported_size: Option<(u16, u16)>,
    cells_drawn: u64,
}

impl DisplayManager {
    pub fn new() -> Result<Self> {
        let stdout = BufWriter::with_capacity(1024 * 1024, io::stdout());
        let mut dm = Self {
            stdout,
            encoder: FrameEncoder::new(),
            reported_size: None,
            cells_drawn: 0,
        };

        if let Err(e) = dm.initialize_terminal() {
            restore_terminal();
            return Err(e);
        }

        Ok(dm)
    }

    fn initialize_terminal(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        self.stdout.execute(EnterAlternateScreen)?;
        self.stdout.execute(cursor::Hide)?;
        // Drawing in the last column must never scroll the screen.
        self.stdout.execute(Print(AUTOWRAP_OFF))?;
        self.stdout.execute(Clear(ClearType::All))?;
        Ok(())
    }
}

impl Surface for DisplayManager {
    fn present(&mut self, grid: &CellGrid) -> Result<()> {
        let (term_cols, term_rows) = terminal::size().context("failed to query terminal size")?;
        let encoded = self.encoder.encode(grid, term_cols, term_rows);

        self.stdout.write_all(encoded.bytes)?;
        self.stdout.flush()?;
        self.cells_drawn += encoded.drawn as u64;

        if encoded.skipped > 0 && self.reported_size != Some((term_cols, term_rows)) {
            self.reported_size = Some((term_cols, term_rows));
            crate::utils::logger::debug(&format!(
                "Terminal {}x{} is smaller than the {}x{} grid; skipping {} cells",
                term_cols, term_rows, grid.width, grid.height, encoded.skipped
            ));
        }
        Ok(())
    }
}

impl Drop for DisplayManager {
    fn drop(&mut self) {
        let _ = self.stdout.flush();
        restore_terminal();
        crate::utils::logger::debug(&format!(
            "Display closed after drawing {} cells",
            self.cells_drawn
        ));
    }
}

/// Best-effort terminal restore; safe to call more than once.
pub fn restore_terminal() {
    let mut stdout = io::stdout();
    let _ = stdout.execute(ResetColor);
    let _ = stdout.execute(Print(AUTOWRAP_ON));
    let _ = stdout.execute(cursor::Show);
    let _ = stdout.execute(LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}
