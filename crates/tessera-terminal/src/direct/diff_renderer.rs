//! ANSI terminal renderer.
//!
//! Minimizes escape sequences and syscalls by:
//! - Batching a frame's output in a `BufWriter`
//! - Skipping cursor moves when the cursor is already in place
//! - Caching the current colors

use super::double_buffer::CellChange;
use crate::color::ColorMode;
use crate::error::TuiError;
use crate::renderer::{GlyphMetrics, Renderer};
use crossterm::cursor::MoveTo;
use crossterm::style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::{queue, QueueableCommand};
use std::io::{self, BufWriter, Write};
use tessera_core::{Color, Glyph};

/// Character printed for a glyph with no printable equivalent.
const REPLACEMENT: char = ' ';

/// Renderer painting glyphs as characters on an ANSI terminal.
#[derive(Debug)]
pub struct AnsiRenderer<W: Write> {
    out: BufWriter<W>,
    color_mode: ColorMode,
    /// Cursor position, `None` when unknown.
    cursor: Option<(i32, i32)>,
    /// Colors last sent, `None` when unknown.
    last_colors: Option<(Option<Color>, Option<Color>)>,
    frame_started: bool,
    /// First write failure of the frame, reported by `present`.
    failed: Option<io::Error>,
    cells_written: usize,
    cursor_moves: usize,
    style_changes: usize,
}

impl<W: Write> AnsiRenderer<W> {
    /// Create a renderer with the detected color mode.
    pub fn new(writer: W) -> Self {
        Self::with_color_mode(writer, ColorMode::detect())
    }

    /// Create a renderer with a specific color mode.
    pub fn with_color_mode(writer: W, color_mode: ColorMode) -> Self {
        Self {
            out: BufWriter::with_capacity(8192, writer),
            color_mode,
            cursor: None,
            last_colors: None,
            frame_started: false,
            failed: None,
            cells_written: 0,
            cursor_moves: 0,
            style_changes: 0,
        }
    }

    /// Get the color mode.
    #[must_use]
    pub const fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Cells written in the last frame.
    #[must_use]
    pub const fn cells_written(&self) -> usize {
        self.cells_written
    }

    /// Cursor moves in the last frame.
    #[must_use]
    pub const fn cursor_moves(&self) -> usize {
        self.cursor_moves
    }

    /// Color changes in the last frame.
    #[must_use]
    pub const fn style_changes(&self) -> usize {
        self.style_changes
    }

    /// The underlying writer. Output is only complete after `present`.
    pub fn get_ref(&self) -> &W {
        self.out.get_ref()
    }

    /// Mutable access to the underlying writer, for draining flushed
    /// output.
    pub fn get_mut(&mut self) -> &mut W {
        self.out.get_mut()
    }

    /// Forget cursor and color state (after a resize or external clear).
    pub fn reset(&mut self) {
        self.cursor = None;
        self.last_colors = None;
    }

    fn start_frame(&mut self) -> io::Result<()> {
        self.frame_started = true;
        self.cells_written = 0;
        self.cursor_moves = 0;
        self.style_changes = 0;
        self.last_colors = None;
        self.out.queue(ResetColor)?;
        Ok(())
    }

    fn paint(&mut self, change: &CellChange) -> io::Result<()> {
        if !self.frame_started {
            self.start_frame()?;
        }

        let (Ok(col), Ok(row)) = (u16::try_from(change.x), u16::try_from(change.y)) else {
            return Ok(());
        };

        if self.cursor != Some((change.x, change.y)) {
            queue!(self.out, MoveTo(col, row))?;
            self.cursor_moves += 1;
        }

        let colors = (change.fg, change.bg);
        if self.last_colors != Some(colors) {
            let fg = self.color_mode.to_crossterm(change.fg);
            let bg = self.color_mode.to_crossterm(change.bg);
            queue!(self.out, SetForegroundColor(fg), SetBackgroundColor(bg))?;
            self.last_colors = Some(colors);
            self.style_changes += 1;
        }

        queue!(self.out, Print(printable(change.glyph)))?;
        self.cursor = Some((change.x + 1, change.y));
        self.cells_written += 1;
        Ok(())
    }
}

/// Character for a glyph; control codes and invalid scalars print blank.
fn printable(glyph: Option<Glyph>) -> char {
    glyph
        .and_then(Glyph::to_char)
        .filter(|c| !c.is_control())
        .unwrap_or(REPLACEMENT)
}

impl<W: Write> Renderer for AnsiRenderer<W> {
    fn draw(&mut self, change: &CellChange, _metrics: &GlyphMetrics) {
        if self.failed.is_some() {
            return;
        }
        if let Err(e) = self.paint(change) {
            self.failed = Some(e);
        }
    }

    fn present(&mut self) -> Result<(), TuiError> {
        let was_started = std::mem::take(&mut self.frame_started);
        if let Some(e) = self.failed.take() {
            self.reset();
            return Err(e.into());
        }
        if was_started {
            self.out.queue(ResetColor)?;
            // Colors were reset, so the cache no longer holds
            self.last_colors = None;
        }
        self.out.flush()?;
        Ok(())
    }
}
