//! Mapping engine colors onto what the terminal can display.

use crossterm::style::Color as CrosstermColor;
use serde::{Deserialize, Serialize};
use tessera_core::Color;

/// Terminal color capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorMode {
    /// 24-bit RGB.
    #[default]
    TrueColor,
    /// xterm 256-color palette.
    Color256,
    /// The 16 ANSI colors.
    Color16,
    /// No color at all.
    Mono,
}

/// Levels of the xterm 6x6x6 color cube.
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// The 16 ANSI colors with their usual xterm RGB values.
const ANSI16: [(CrosstermColor, [u8; 3]); 16] = [
    (CrosstermColor::Black, [0, 0, 0]),
    (CrosstermColor::DarkRed, [128, 0, 0]),
    (CrosstermColor::DarkGreen, [0, 128, 0]),
    (CrosstermColor::DarkYellow, [128, 128, 0]),
    (CrosstermColor::DarkBlue, [0, 0, 128]),
    (CrosstermColor::DarkMagenta, [128, 0, 128]),
    (CrosstermColor::DarkCyan, [0, 128, 128]),
    (CrosstermColor::Grey, [192, 192, 192]),
    (CrosstermColor::DarkGrey, [128, 128, 128]),
    (CrosstermColor::Red, [255, 0, 0]),
    (CrosstermColor::Green, [0, 255, 0]),
    (CrosstermColor::Yellow, [255, 255, 0]),
    (CrosstermColor::Blue, [0, 0, 255]),
    (CrosstermColor::Magenta, [255, 0, 255]),
    (CrosstermColor::Cyan, [0, 255, 255]),
    (CrosstermColor::White, [255, 255, 255]),
];

impl ColorMode {
    /// Detect the mode from `COLORTERM` and `TERM`.
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_with_env(
            std::env::var("COLORTERM").ok().as_deref(),
            std::env::var("TERM").ok().as_deref(),
        )
    }

    /// Detect the mode from explicit environment values.
    #[must_use]
    pub fn detect_with_env(colorterm: Option<&str>, term: Option<&str>) -> Self {
        if matches!(colorterm, Some("truecolor" | "24bit")) {
            return Self::TrueColor;
        }

        match term {
            Some(t) if t.contains("256color") => Self::Color256,
            Some("dumb") | None => Self::Mono,
            Some(_) => Self::Color16,
        }
    }

    /// Convert an optional engine color.
    ///
    /// An absent or fully transparent color maps to `Reset`, the terminal's
    /// own default.
    #[must_use]
    pub fn to_crossterm(self, color: Option<Color>) -> CrosstermColor {
        let Some(color) = color.filter(|c| !c.is_transparent()) else {
            return CrosstermColor::Reset;
        };
        let [r, g, b, _] = color.to_rgba8();

        match self {
            Self::TrueColor => CrosstermColor::Rgb { r, g, b },
            Self::Color256 => CrosstermColor::AnsiValue(rgb_to_256(r, g, b)),
            Self::Color16 => rgb_to_16(r, g, b),
            Self::Mono => CrosstermColor::Reset,
        }
    }
}

fn distance(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b)
        .map(|(&x, y)| {
            let d = i32::from(x) - i32::from(y);
            (d * d) as u32
        })
        .sum()
}

fn nearest_cube_level(v: u8) -> usize {
    CUBE_LEVELS
        .iter()
        .enumerate()
        .min_by_key(|(_, level)| (i16::from(**level) - i16::from(v)).unsigned_abs())
        .map_or(0, |(i, _)| i)
}

/// Nearest entry of the 256-color palette, cube or grey ramp.
fn rgb_to_256(r: u8, g: u8, b: u8) -> u8 {
    let (ri, gi, bi) = (nearest_cube_level(r), nearest_cube_level(g), nearest_cube_level(b));
    let cube = [CUBE_LEVELS[ri], CUBE_LEVELS[gi], CUBE_LEVELS[bi]];
    let cube_index = 16 + 36 * ri + 6 * gi + bi;

    // Grey ramp 232..=255 covers 8, 18, ..., 238
    let mean = (u16::from(r) + u16::from(g) + u16::from(b)) / 3;
    let step = (mean.saturating_sub(3) / 10).min(23) as u8;
    let grey_level = 8 + 10 * step;
    let grey = [grey_level; 3];

    if distance([r, g, b], grey) < distance([r, g, b], cube) {
        232 + step
    } else {
        cube_index as u8
    }
}

/// Nearest of the 16 ANSI colors.
fn rgb_to_16(r: u8, g: u8, b: u8) -> CrosstermColor {
    ANSI16
        .iter()
        .min_by_key(|(_, rgb)| distance([r, g, b], *rgb))
        .map_or(CrosstermColor::Reset, |(color, _)| *color)
}
