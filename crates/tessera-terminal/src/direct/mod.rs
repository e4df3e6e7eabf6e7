//! Grid buffers and the direct crossterm renderer.
//!
//! ```text
//! put → DoubleBuffer (back) ─refresh→ CellChange → Renderer
//!                                                    ↑
//!                                              AnsiRenderer → crossterm
//! ```

mod cell_buffer;
mod diff_renderer;
mod double_buffer;

pub use cell_buffer::{Cell, GridBuffer};
pub use diff_renderer::AnsiRenderer;
pub use double_buffer::{CellChange, DoubleBuffer};
