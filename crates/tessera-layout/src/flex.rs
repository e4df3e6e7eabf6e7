//! Flexbox layout on an integer cell grid.
//!
//! [`Flex::layout`] is a pure function of the container size and the
//! children's optional sizes. Results are relative to the container origin
//! and returned in child order.

use serde::{Deserialize, Serialize};
use tessera_core::Rect;

/// Direction for flex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlexDirection {
    /// Horizontal (left to right)
    #[default]
    Row,
    /// Vertical (top to bottom)
    Column,
}

/// Main axis distribution for flex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlexJustify {
    /// Pack items at the start
    #[default]
    Start,
    /// Pack items at the end
    End,
    /// Center the packed items
    Center,
    /// Split the free space among flexible items
    Stretch,
    /// Equal padding before, between and after items
    SpaceAround,
    /// First item at the start, last at the end, equal gaps between
    SpaceBetween,
}

/// Cross axis alignment for flex layout (also used for self-alignment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlexAlign {
    /// Align to the start
    Start,
    /// Align to the end
    End,
    /// Center items
    Center,
    /// Stretch to fill
    #[default]
    Stretch,
}

/// A child of a flex container.
///
/// An absent size makes the child flexible in that axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlexItem {
    /// Fixed width in cells
    pub width: Option<i32>,
    /// Fixed height in cells
    pub height: Option<i32>,
}

impl FlexItem {
    /// A child flexible in both axes.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            width: None,
            height: None,
        }
    }

    /// A child with both sizes fixed.
    #[must_use]
    pub const fn sized(width: i32, height: i32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    /// Fix the width.
    #[must_use]
    pub const fn width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self
    }

    /// Fix the height.
    #[must_use]
    pub const fn height(mut self, height: i32) -> Self {
        self.height = Some(height);
        self
    }

    /// Sizes as (main, cross) for the given direction.
    const fn axes(self, direction: FlexDirection) -> (Option<i32>, Option<i32>) {
        match direction {
            FlexDirection::Row => (self.width, self.height),
            FlexDirection::Column => (self.height, self.width),
        }
    }
}

/// Flex container settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flex {
    /// Flow direction
    pub direction: FlexDirection,
    /// Main axis distribution
    pub justify: FlexJustify,
    /// Cross axis alignment
    pub align: FlexAlign,
    /// Main size given to flexible children when not stretching
    pub basis: i32,
}

impl Flex {
    /// Row, start-justified, stretch-aligned, zero basis.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the direction.
    #[must_use]
    pub const fn direction(mut self, direction: FlexDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set main axis distribution.
    #[must_use]
    pub const fn justify(mut self, justify: FlexJustify) -> Self {
        self.justify = justify;
        self
    }

    /// Set cross axis alignment.
    #[must_use]
    pub const fn align(mut self, align: FlexAlign) -> Self {
        self.align = align;
        self
    }

    /// Set the basis.
    #[must_use]
    pub const fn basis(mut self, basis: i32) -> Self {
        self.basis = basis;
        self
    }

    /// Compute child rectangles inside a `width` x `height` container.
    ///
    /// Free space may be negative, in which case children overflow.
    #[must_use]
    pub fn layout(&self, width: i32, height: i32, items: &[FlexItem]) -> Vec<Rect> {
        if items.is_empty() {
            return Vec::new();
        }

        let (main_extent, cross_extent) = match self.direction {
            FlexDirection::Row => (width, height),
            FlexDirection::Column => (height, width),
        };

        // Cross axis
        let cross: Vec<(i32, i32)> = items
            .iter()
            .map(|item| {
                let size = item.axes(self.direction).1.unwrap_or(cross_extent);
                match self.align {
                    FlexAlign::Start => (0, size),
                    FlexAlign::End => (cross_extent - size, size),
                    FlexAlign::Center => ((cross_extent - size).div_euclid(2), size),
                    FlexAlign::Stretch => (0, cross_extent),
                }
            })
            .collect();

        // Main axis sizes; `None` only survives for stretch
        let mut sizes: Vec<Option<i32>> = items
            .iter()
            .map(|item| {
                let size = item.axes(self.direction).0;
                if self.justify == FlexJustify::Stretch {
                    size
                } else {
                    Some(size.unwrap_or(self.basis))
                }
            })
            .collect();

        let used: i32 = sizes.iter().flatten().sum();
        let available = main_extent - used;
        let flexible = sizes.iter().filter(|s| s.is_none()).count() as i32;

        if flexible > 0 {
            let share = available.div_euclid(flexible);
            for size in &mut sizes {
                size.get_or_insert(share);
            }
        }
        let sizes: Vec<i32> = sizes.into_iter().map(|s| s.unwrap_or(0)).collect();
        let offsets = self.main_offsets(main_extent, available, &sizes);

        offsets
            .into_iter()
            .zip(sizes)
            .zip(cross)
            .map(|((main, main_size), (cross, cross_size))| match self.direction {
                FlexDirection::Row => Rect::new(main, cross, main_size, cross_size),
                FlexDirection::Column => Rect::new(cross, main, cross_size, main_size),
            })
            .collect()
    }

    fn main_offsets(&self, extent: i32, available: i32, sizes: &[i32]) -> Vec<i32> {
        let n = sizes.len() as i32;
        let pack = |start: i32, gap: i32| {
            let mut x = start;
            sizes
                .iter()
                .map(|size| {
                    let at = x;
                    x += size + gap;
                    at
                })
                .collect::<Vec<_>>()
        };

        match self.justify {
            FlexJustify::Start | FlexJustify::Stretch => pack(0, 0),
            FlexJustify::Center => pack(available.div_euclid(2), 0),
            FlexJustify::End => {
                let mut x = extent;
                let mut offsets: Vec<i32> = sizes
                    .iter()
                    .rev()
                    .map(|size| {
                        x -= size;
                        x
                    })
                    .collect();
                offsets.reverse();
                offsets
            }
            FlexJustify::SpaceAround => {
                // round half up
                let slots = n + 1;
                let padding = (2 * available + slots).div_euclid(2 * slots);
                pack(padding, padding)
            }
            FlexJustify::SpaceBetween => {
                if n == 1 {
                    return vec![0];
                }
                // Gap i ends at floor(i * available / (n - 1)); the remainder
                // carries forward so the gaps add up to exactly `available`.
                let mut x = 0;
                sizes
                    .iter()
                    .enumerate()
                    .map(|(i, size)| {
                        let at = x + (i as i32 * available).div_euclid(n - 1);
                        x += size;
                        at
                    })
                    .collect()
            }
        }
    }
}

/// Free-function form of [`Flex::layout`].
#[must_use]
pub fn flex(width: i32, height: i32, settings: &Flex, items: &[FlexItem]) -> Vec<Rect> {
    settings.layout(width, height, items)
}
