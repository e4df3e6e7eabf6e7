//! Input events delivered to the engine between frames.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Input event types.
///
/// Positions are already converted to grid cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Pointer moved to a cell
    MouseMove {
        /// New position
        position: Point,
    },
    /// Mouse button pressed
    MouseDown {
        /// Position of the press
        position: Point,
        /// Button pressed
        button: MouseButton,
    },
    /// Mouse button released
    MouseUp {
        /// Position of the release
        position: Point,
        /// Button released
        button: MouseButton,
    },
    /// Mouse wheel scrolled
    Scroll {
        /// Horizontal scroll delta
        delta_x: f32,
        /// Vertical scroll delta
        delta_y: f32,
        /// Depth scroll delta
        delta_z: f32,
    },
    /// Key pressed
    KeyDown {
        /// Key pressed
        key: Key,
        /// Modifiers held while pressing
        modifiers: KeyModifiers,
    },
    /// Key released
    KeyUp {
        /// Key released
        key: Key,
    },
    /// Display resized (in cells)
    Resize {
        /// New width
        width: u16,
        /// New height
        height: u16,
    },
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left (primary) mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (wheel click)
    Middle,
}

impl MouseButton {
    /// The button that drives focus and activation.
    pub const PRIMARY: Self = Self::Left;
}

/// Keyboard key identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A printable character
    Char(char),
    /// Function key F1..F24
    F(u8),
    /// Enter/Return key
    Enter,
    /// Escape key
    Escape,
    /// Backspace key
    Backspace,
    /// Tab key
    Tab,
    /// Delete key
    Delete,
    /// Insert key
    Insert,
    /// Home key
    Home,
    /// End key
    End,
    /// Page Up key
    PageUp,
    /// Page Down key
    PageDown,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Shift
    Shift,
    /// Control
    Control,
    /// Alt / Option
    Alt,
    /// Meta (Windows/Command)
    Meta,
}

impl Key {
    /// Space bar.
    pub const SPACE: Self = Self::Char(' ');

    /// Check if this key is a modifier.
    #[must_use]
    pub const fn is_modifier(&self) -> bool {
        matches!(self, Self::Shift | Self::Control | Self::Alt | Self::Meta)
    }
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyModifiers(u8);

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self(0);
    /// Shift held.
    pub const SHIFT: Self = Self(1 << 0);
    /// Control held.
    pub const CONTROL: Self = Self(1 << 1);
    /// Alt held.
    pub const ALT: Self = Self(1 << 2);
    /// Meta held.
    pub const META: Self = Self(1 << 3);

    /// Check if no modifier is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if a specific modifier is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Add a modifier.
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for KeyModifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}
