#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
//! Layout for the Tessera grid UI engine.
//!
//! Everything here is a pure function over integer cell sizes:
//!
//! - **Flex**: [`Flex::layout`] distributes children along a row or column
//! - **Self-alignment**: [`aligned_bounds`] places one child in its parent
//! - **Wrapping**: [`soft_wrap`] and [`hard_wrap`] fit text to a width

mod align;
mod flex;
mod wrap;

pub use align::aligned_bounds;
pub use flex::{flex, Flex, FlexAlign, FlexDirection, FlexItem, FlexJustify};
pub use wrap::{hard_wrap, soft_wrap};
