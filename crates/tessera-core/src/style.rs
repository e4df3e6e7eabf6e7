//! Glyph codes and cell styles.

use crate::color::Color;
use serde::{Deserialize, Serialize};

/// Index into a font atlas identifying a character image.
///
/// Text primitives use the Unicode scalar value of each character, so a
/// glyph is also a `char` for atlases laid out in code-point order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Glyph(pub u32);

impl Glyph {
    /// Glyph 0, the blank atlas slot.
    pub const BLANK: Self = Self(0);

    /// Raw atlas index.
    #[must_use]
    pub const fn code(self) -> u32 {
        self.0
    }

    /// The character this glyph stands for, if it is a valid scalar value.
    #[must_use]
    pub fn to_char(self) -> Option<char> {
        char::from_u32(self.0)
    }
}

impl From<char> for Glyph {
    fn from(c: char) -> Self {
        Self(u32::from(c))
    }
}

impl From<u32> for Glyph {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

impl From<u8> for Glyph {
    fn from(code: u8) -> Self {
        Self(u32::from(code))
    }
}

/// Foreground and background colors for a write.
///
/// `None` means "not specified": an unspecified foreground clears the
/// cell's foreground, an unspecified background keeps whatever background
/// the cell already has this frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Style {
    /// Foreground (glyph) color
    pub fg: Option<Color>,
    /// Background (cell) color
    pub bg: Option<Color>,
}

impl Style {
    /// Style with neither color set.
    pub const NONE: Self = Self { fg: None, bg: None };

    /// Style with only a foreground.
    #[must_use]
    pub const fn fg(color: Color) -> Self {
        Self {
            fg: Some(color),
            bg: None,
        }
    }

    /// Style with only a background.
    #[must_use]
    pub const fn bg(color: Color) -> Self {
        Self {
            fg: None,
            bg: Some(color),
        }
    }

    /// Style with both colors.
    #[must_use]
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self {
            fg: Some(fg),
            bg: Some(bg),
        }
    }

    /// Replace the foreground.
    #[must_use]
    pub const fn with_fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Replace the background.
    #[must_use]
    pub const fn with_bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Overlay `other` on top of `self`: colors set in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
        }
    }

    /// Overlay `other` only when `condition` holds.
    #[must_use]
    pub fn merge_if(self, condition: bool, other: Self) -> Self {
        if condition {
            self.merge(other)
        } else {
            self
        }
    }
}
