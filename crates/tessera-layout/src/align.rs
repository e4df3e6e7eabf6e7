//! Self-alignment of a single child inside its parent.

use crate::flex::FlexAlign;
use tessera_core::Rect;

/// Place `child` inside a parent of `parent`'s size.
///
/// `align` positions the child horizontally and `justify` vertically.
/// `None` keeps the child's own coordinate and size on that axis. The
/// result is relative to the parent origin.
#[must_use]
pub fn aligned_bounds(
    parent: Rect,
    child: Rect,
    justify: Option<FlexAlign>,
    align: Option<FlexAlign>,
) -> Rect {
    let (x, width) = align_axis(align, parent.width, child.x, child.width);
    let (y, height) = align_axis(justify, parent.height, child.y, child.height);
    Rect::new(x, y, width, height)
}

fn align_axis(align: Option<FlexAlign>, extent: i32, offset: i32, size: i32) -> (i32, i32) {
    match align {
        None => (offset, size),
        Some(FlexAlign::Start) => (0, size),
        Some(FlexAlign::End) => (extent - size, size),
        Some(FlexAlign::Center) => ((extent - size).div_euclid(2), size),
        Some(FlexAlign::Stretch) => (0, extent),
    }
}
