//! Core types for the Tessera character-grid UI engine.
//!
//! This crate holds the data the engine passes around, with no terminal or
//! rendering code:
//! - Geometry: [`Point`], [`Rect`]
//! - Appearance: [`Color`], [`Style`], [`Glyph`]
//! - Input: [`Event`], [`Key`], [`MouseButton`] and the edge-triggered
//!   [`Mouse`] / [`Keyboard`] state in [`InputState`]
//! - Focus: [`FocusController`] and [`FocusableState`]
//! - Context injection: [`ContextToken`] and [`ContextStacks`]

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

mod color;
mod context;
mod event;
mod focus;
mod geometry;
mod input;
mod style;

pub use color::{Color, ColorParseError};
pub use context::{ContextStacks, ContextToken};
pub use event::{Event, Key, KeyModifiers, MouseButton};
pub use focus::{FocusController, FocusableState};
pub use geometry::{Point, Rect};
pub use input::{InputState, Keyboard, Mouse};
pub use style::{Glyph, Style};
