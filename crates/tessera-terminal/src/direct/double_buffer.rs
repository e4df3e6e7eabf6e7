//! Front/back grid pair with minimal diffing.
//!
//! The front grid is the last committed frame and the back grid the frame
//! being drawn. [`DoubleBuffer::refresh`] reports every cell whose painted
//! content differs between the two, then swaps them and clears the new back.

use super::cell_buffer::{Cell, GridBuffer};
use tessera_core::{Color, Glyph};

/// One changed cell reported by [`DoubleBuffer::refresh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellChange {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
    /// New glyph
    pub glyph: Option<Glyph>,
    /// New foreground
    pub fg: Option<Color>,
    /// New background
    pub bg: Option<Color>,
}

impl CellChange {
    fn new(x: i32, y: i32, cell: &Cell) -> Self {
        Self {
            x,
            y,
            glyph: cell.glyph,
            fg: cell.fg,
            bg: cell.bg,
        }
    }
}

/// Two grids of the same size.
#[derive(Debug, Clone)]
pub struct DoubleBuffer {
    front: GridBuffer,
    back: GridBuffer,
    /// Report every cell on the next refresh.
    full_repaint: bool,
}

impl DoubleBuffer {
    /// Create an empty pair.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            front: GridBuffer::new(width, height),
            back: GridBuffer::new(width, height),
            full_repaint: false,
        }
    }

    /// Grid width.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.back.width()
    }

    /// Grid height.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.back.height()
    }

    /// The committed frame.
    #[must_use]
    pub const fn front(&self) -> &GridBuffer {
        &self.front
    }

    /// The frame in progress.
    #[must_use]
    pub const fn back(&self) -> &GridBuffer {
        &self.back
    }

    /// Write into the back grid. See [`GridBuffer::put`].
    pub fn put(
        &mut self,
        x: i32,
        y: i32,
        glyph: Option<Glyph>,
        fg: Option<Color>,
        bg: Option<Color>,
        layer: i32,
    ) -> bool {
        self.back.put(x, y, glyph, fg, bg, layer)
    }

    /// Diff back against front, report changes, and commit.
    ///
    /// `emit` is called once per changed cell in row-major order. Returns
    /// the number of changes. A back grid with nothing written since the
    /// last commit keeps the committed frame and reports nothing.
    pub fn refresh<F>(&mut self, mut emit: F) -> usize
    where
        F: FnMut(&CellChange),
    {
        let full = std::mem::take(&mut self.full_repaint);
        if !full && self.back.touched_count() == 0 {
            return 0;
        }
        let mut changed = 0;

        for (idx, (back, front)) in self.back.cells().iter().zip(self.front.cells()).enumerate() {
            if full || !back.same_content(front) {
                let (x, y) = self.back.coords(idx);
                emit(&CellChange::new(x, y, back));
                changed += 1;
            }
        }

        std::mem::swap(&mut self.front, &mut self.back);
        self.back.clear();

        if changed > 0 {
            log::debug!("refresh: {changed} cells changed");
        }
        changed
    }

    /// Throw away the frame in progress. The committed frame is untouched.
    pub fn discard(&mut self) {
        self.back.clear();
    }

    /// Reallocate both grids, cleared.
    pub fn resize(&mut self, width: u16, height: u16) {
        log::debug!("resize: {width}x{height}");
        self.front.resize(width, height);
        self.back.resize(width, height);
    }

    /// Forget the committed frame so the next refresh repaints every cell.
    pub fn invalidate(&mut self) {
        self.front.clear();
        self.full_repaint = true;
    }
}
