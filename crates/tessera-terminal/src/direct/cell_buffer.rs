//! Flat grid of cells with layer-priority writes.
//!
//! Every write marks its cell in a touched bitset, so clearing a mostly
//! empty frame only visits the cells that were drawn.

use bitvec::prelude::*;
use tessera_core::{Color, Glyph};

/// A single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cell {
    /// Atlas glyph, `None` for an empty cell.
    pub glyph: Option<Glyph>,
    /// Foreground color.
    pub fg: Option<Color>,
    /// Background color.
    pub bg: Option<Color>,
    /// Priority of the last write.
    pub layer: i32,
}

impl Cell {
    /// Empty cell on layer 0.
    pub const EMPTY: Self = Self {
        glyph: None,
        fg: None,
        bg: None,
        layer: 0,
    };

    /// Check if nothing visible is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyph.is_none() && self.fg.is_none() && self.bg.is_none()
    }

    /// Compare what a renderer would paint, ignoring the layer.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.glyph == other.glyph && self.fg == other.fg && self.bg == other.bg
    }
}

/// Width x height grid of [`Cell`]s.
#[derive(Debug, Clone)]
pub struct GridBuffer {
    cells: Vec<Cell>,
    width: u16,
    height: u16,
    /// Cells written since the last clear (1 bit per cell).
    touched: BitVec,
}

impl GridBuffer {
    /// Create an empty buffer with the given dimensions.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            cells: vec![Cell::EMPTY; size],
            width,
            height,
            touched: bitvec![0; size],
        }
    }

    /// Get the buffer width.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the buffer height.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get total cell count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the buffer has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Linear index of `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        let width = usize::from(self.width);
        (x < width && y < usize::from(self.height)).then(|| y * width + x)
    }

    /// Convert a linear index to `(x, y)`.
    #[must_use]
    pub fn coords(&self, idx: usize) -> (i32, i32) {
        let width = usize::from(self.width).max(1);
        ((idx % width) as i32, (idx / width) as i32)
    }

    /// Get a cell reference.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    /// Get cells slice in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Glyphs of row `y` as text. Empty and unprintable cells read as spaces.
    #[must_use]
    pub fn row_text(&self, y: i32) -> String {
        (0..i32::from(self.width))
            .filter_map(|x| self.get(x, y))
            .map(|cell| {
                cell.glyph
                    .and_then(Glyph::to_char)
                    .filter(|c| !c.is_control())
                    .unwrap_or(' ')
            })
            .collect()
    }

    /// Write a cell, honoring layer priority.
    ///
    /// Out-of-range coordinates and writes below the stored layer are
    /// ignored. The glyph and foreground always replace the stored values;
    /// the background is replaced only when `bg` is `Some`. Returns whether
    /// the write landed.
    pub fn put(
        &mut self,
        x: i32,
        y: i32,
        glyph: Option<Glyph>,
        fg: Option<Color>,
        bg: Option<Color>,
        layer: i32,
    ) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        let cell = &mut self.cells[idx];
        if layer < cell.layer {
            return false;
        }

        cell.glyph = glyph;
        cell.fg = fg;
        if bg.is_some() {
            cell.bg = bg;
        }
        cell.layer = layer;
        self.touched.set(idx, true);
        true
    }

    /// Number of cells written since the last clear.
    #[must_use]
    pub fn touched_count(&self) -> usize {
        self.touched.count_ones()
    }

    /// Reset every written cell to [`Cell::EMPTY`].
    pub fn clear(&mut self) {
        for idx in self.touched.iter_ones() {
            self.cells[idx] = Cell::EMPTY;
        }
        self.touched.fill(false);
    }

    /// Resize the buffer (clears all content).
    pub fn resize(&mut self, width: u16, height: u16) {
        let size = usize::from(width) * usize::from(height);
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(size, Cell::EMPTY);
        self.touched = bitvec![0; size];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn glyph(c: char) -> Option<Glyph> {
        Some(Glyph::from(c))
    }

    #[test]
    fn test_cell_default_is_empty() {
        let cell = Cell::default();
        assert_eq!(cell, Cell::EMPTY);
        assert!(cell.is_empty());
        assert_eq!(cell.layer, 0);
    }

    #[test]
    fn test_cell_same_content_ignores_layer() {
        let a = Cell {
            glyph: glyph('a'),
            layer: 3,
            ..Cell::EMPTY
        };
        let b = Cell {
            glyph: glyph('a'),
            ..Cell::EMPTY
        };
        assert!(a.same_content(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_buffer_creation() {
        let buf = GridBuffer::new(80, 24);
        assert_eq!(buf.width(), 80);
        assert_eq!(buf.height(), 24);
        assert_eq!(buf.len(), 1920);
        assert!(!buf.is_empty());
        assert!(GridBuffer::new(0, 0).is_empty());
    }

    #[test]
    fn test_buffer_index_and_coords() {
        let buf = GridBuffer::new(10, 5);
        assert_eq!(buf.index(0, 0), Some(0));
        assert_eq!(buf.index(5, 2), Some(25));
        assert_eq!(buf.index(10, 0), None);
        assert_eq!(buf.index(0, 5), None);
        assert_eq!(buf.index(-1, 0), None);
        assert_eq!(buf.coords(25), (5, 2));
    }

    #[test]
    fn test_put_writes_cell() {
        let mut buf = GridBuffer::new(10, 5);
        assert!(buf.put(3, 1, glyph('x'), Some(Color::RED), Some(Color::BLUE), 0));
        let cell = buf.get(3, 1).unwrap();
        assert_eq!(cell.glyph, glyph('x'));
        assert_eq!(cell.fg, Some(Color::RED));
        assert_eq!(cell.bg, Some(Color::BLUE));
        assert_eq!(buf.touched_count(), 1);
    }

    #[test]
    fn test_put_out_of_bounds_is_noop() {
        let mut buf = GridBuffer::new(4, 4);
        assert!(!buf.put(4, 0, glyph('x'), None, None, 0));
        assert!(!buf.put(0, -1, glyph('x'), None, None, 0));
        assert_eq!(buf.touched_count(), 0);
        assert!(buf.cells().iter().all(Cell::is_empty));
    }

    #[test]
    fn test_lower_layer_is_ignored() {
        let mut buf = GridBuffer::new(4, 4);
        buf.put(0, 0, glyph('h'), Some(Color::WHITE), None, 2);
        assert!(!buf.put(0, 0, glyph('l'), Some(Color::BLACK), None, 1));
        assert_eq!(buf.get(0, 0).unwrap().glyph, glyph('h'));
        assert_eq!(buf.get(0, 0).unwrap().layer, 2);
    }

    #[test]
    fn test_equal_layer_last_write_wins() {
        let mut buf = GridBuffer::new(4, 4);
        buf.put(0, 0, glyph('a'), None, None, 1);
        buf.put(0, 0, glyph('b'), None, None, 1);
        assert_eq!(buf.get(0, 0).unwrap().glyph, glyph('b'));
    }

    #[test]
    fn test_omitted_bg_is_preserved_fg_is_not() {
        let mut buf = GridBuffer::new(4, 4);
        buf.put(1, 1, glyph(' '), Some(Color::RED), Some(Color::GREY), 0);
        buf.put(1, 1, glyph('x'), None, None, 0);
        let cell = buf.get(1, 1).unwrap();
        assert_eq!(cell.glyph, glyph('x'));
        assert_eq!(cell.fg, None);
        assert_eq!(cell.bg, Some(Color::GREY));
    }

    #[test]
    fn test_clear_resets_written_cells() {
        let mut buf = GridBuffer::new(10, 5);
        buf.put(0, 0, glyph('x'), Some(Color::RED), Some(Color::BLUE), 5);
        buf.put(9, 4, glyph('y'), None, None, 0);
        buf.clear();
        assert!(buf.cells().iter().all(|c| *c == Cell::EMPTY));
        assert_eq!(buf.touched_count(), 0);

        assert!(buf.put(0, 0, glyph('z'), None, None, 0));
    }

    #[test]
    fn test_resize_clears() {
        let mut buf = GridBuffer::new(10, 5);
        buf.put(0, 0, glyph('x'), None, None, 0);
        buf.resize(20, 10);
        assert_eq!(buf.len(), 200);
        assert_eq!(buf.get(0, 0), Some(&Cell::EMPTY));
        assert_eq!(buf.touched_count(), 0);
        assert!(buf.put(19, 9, glyph('x'), None, None, 0));
    }

    proptest! {
        #[test]
        fn prop_out_of_range_put_leaves_grid_unchanged(
            x in -50i32..50,
            y in -50i32..50,
            layer in -3i32..3,
        ) {
            prop_assume!(!(0..8).contains(&x) || !(0..6).contains(&y));
            let mut buf = GridBuffer::new(8, 6);
            buf.put(1, 1, glyph('k'), None, Some(Color::RED), 0);
            let before = buf.cells().to_vec();
            buf.put(x, y, glyph('x'), Some(Color::WHITE), Some(Color::BLACK), layer);
            prop_assert_eq!(buf.cells(), &before[..]);
        }

        #[test]
        fn prop_highest_layer_persists(layers in prop::collection::vec(0i32..5, 1..10)) {
            let mut sorted = layers;
            sorted.sort_unstable_by(|a, b| b.cmp(a));
            let mut buf = GridBuffer::new(1, 1);
            for (i, layer) in sorted.iter().enumerate() {
                buf.put(0, 0, Some(Glyph(i as u32)), None, None, *layer);
            }
            // Last write among those sharing the top layer
            let top = sorted[0];
            let winner = sorted.iter().rposition(|l| *l == top).unwrap();
            prop_assert_eq!(buf.get(0, 0).unwrap().glyph, Some(Glyph(winner as u32)));
        }
    }
}
