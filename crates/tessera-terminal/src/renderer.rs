//! The renderer contract and glyph-atlas geometry.
//!
//! A [`Renderer`] receives one [`CellChange`] per changed cell, in scan
//! order, and then a single [`Renderer::present`] call per frame.

use crate::direct::CellChange;
use crate::error::TuiError;
use serde::{Deserialize, Serialize};
use tessera_core::{Glyph, Point, Rect};

/// Pixel geometry of a monospace glyph atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphMetrics {
    /// Width of one glyph in atlas pixels
    pub cell_width: u32,
    /// Height of one glyph in atlas pixels
    pub cell_height: u32,
    /// Glyph rows in the atlas
    pub atlas_rows: u32,
    /// Glyph columns in the atlas
    pub atlas_columns: u32,
    /// Integer upscale from atlas pixels to screen pixels
    pub scale: u32,
}

impl Default for GlyphMetrics {
    /// One pixel per cell: the identity mapping used by text terminals.
    fn default() -> Self {
        Self {
            cell_width: 1,
            cell_height: 1,
            atlas_rows: 16,
            atlas_columns: 16,
            scale: 1,
        }
    }
}

impl GlyphMetrics {
    /// Metrics for a `columns` x `rows` atlas of `width` x `height` glyphs.
    #[must_use]
    pub const fn new(width: u32, height: u32, columns: u32, rows: u32) -> Self {
        Self {
            cell_width: width,
            cell_height: height,
            atlas_rows: rows,
            atlas_columns: columns,
            scale: 1,
        }
    }

    /// Set the upscale factor.
    #[must_use]
    pub const fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    fn screen_cell(&self) -> (i32, i32) {
        let scale = self.scale.max(1);
        (
            (self.cell_width * scale) as i32,
            (self.cell_height * scale) as i32,
        )
    }

    /// Top-left atlas pixel of `glyph`. Glyphs are laid out row by row.
    #[must_use]
    pub fn atlas_source(&self, glyph: Glyph) -> (u32, u32) {
        let columns = self.atlas_columns.max(1);
        let code = glyph.code();
        (
            (code % columns) * self.cell_width,
            (code / columns) * self.cell_height,
        )
    }

    /// Screen pixel rectangle covered by grid cell `(x, y)`.
    #[must_use]
    pub fn destination(&self, x: i32, y: i32) -> Rect {
        let (w, h) = self.screen_cell();
        Rect::new(x * w, y * h, w, h)
    }

    /// Grid cell containing screen pixel `(px, py)`.
    #[must_use]
    pub fn pixel_to_grid(&self, px: i32, py: i32) -> Point {
        let (w, h) = self.screen_cell();
        Point::new(px.div_euclid(w.max(1)), py.div_euclid(h.max(1)))
    }

    /// Screen size in pixels of a `width` x `height` grid.
    #[must_use]
    pub fn screen_size(&self, width: u16, height: u16) -> (u32, u32) {
        let (w, h) = self.screen_cell();
        (
            u32::from(width) * w as u32,
            u32::from(height) * h as u32,
        )
    }
}

/// Consumer of the per-frame diff.
pub trait Renderer {
    /// Paint one changed cell.
    fn draw(&mut self, change: &CellChange, metrics: &GlyphMetrics);

    /// Called once after the last `draw` of a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if painting failed.
    fn present(&mut self) -> Result<(), TuiError> {
        Ok(())
    }
}

/// Renderer that keeps every change it receives.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    /// Changes in the order they were drawn
    pub changes: Vec<CellChange>,
    /// Number of `present` calls
    pub presents: usize,
}

impl RecordingRenderer {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the recorded changes, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<CellChange> {
        std::mem::take(&mut self.changes)
    }

    /// Recorded change at `(x, y)`, the most recent one if drawn twice.
    #[must_use]
    pub fn at(&self, x: i32, y: i32) -> Option<&CellChange> {
        self.changes.iter().rev().find(|c| c.x == x && c.y == y)
    }
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, change: &CellChange, _metrics: &GlyphMetrics) {
        self.changes.push(*change);
    }

    fn present(&mut self) -> Result<(), TuiError> {
        self.presents += 1;
        Ok(())
    }
}
