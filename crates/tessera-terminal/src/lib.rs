//! Double-buffered grid engine and terminal backend for Tessera.
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::doc_markdown)] // "item in documentation missing backticks"
//!
//! Application code re-issues its drawing every frame through a [`Ui`]. The
//! engine collects the writes in a back grid, diffs it against the last
//! committed frame and hands only the changed cells to a [`Renderer`].
//!
//! # Example
//!
//! ```no_run
//! use tessera_terminal::{Frame, Text, TuiApp, UiConfig};
//!
//! let mut app = TuiApp::new(UiConfig::default());
//! app.run(|ui| {
//!     Frame::new().title("tessera").draw(ui, |ui| {
//!         Text::new("hello").draw(ui);
//!         Ok(())
//!     })
//! })?;
//! # Ok::<(), tessera_terminal::TuiError>(())
//! ```

mod app;
mod color;
mod config;
pub mod direct;
mod error;
mod input;
mod primitives;
mod renderer;
mod stacks;
mod ui;
mod view;

pub use app::{
    CrosstermBackend, CrosstermTerminal, FrameMetrics, GenericTerminal, Terminal, TerminalBackend,
    TerminalMode, TestableBackend, TuiApp,
};
pub use color::ColorMode;
pub use config::UiConfig;
pub use direct::{AnsiRenderer, Cell, CellChange, DoubleBuffer, GridBuffer};
pub use error::{TuiError, UiError};
pub use input::{InputAdapter, KeyBinding};
pub use primitives::{
    BorderStyle, FlexBox, Focusable, Frame, Group, Panel, ScrollRegion, Text, WrapMode,
    WrappedText,
};
pub use renderer::{GlyphMetrics, RecordingRenderer, Renderer};
pub use stacks::{LayoutStacks, StackKind};
pub use ui::{FrameStats, Scope, Ui};
pub use view::{View, ViewCommands, ViewStack};

// Re-export core and layout types for convenience
pub use tessera_core::{
    Color, ContextToken, Event, FocusableState, Glyph, Key, KeyModifiers, MouseButton, Point,
    Rect, Style,
};
pub use tessera_layout::{Flex, FlexAlign, FlexDirection, FlexItem, FlexJustify};
