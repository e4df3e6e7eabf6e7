//! Engine and run-loop configuration.

use crate::color::ColorMode;
use crate::renderer::GlyphMetrics;
use serde::{Deserialize, Serialize};
use tessera_core::Key;

/// Configuration for a [`crate::Ui`] and the [`crate::TuiApp`] driving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Grid width in cells.
    pub width: u16,
    /// Grid height in cells.
    pub height: u16,
    /// Tick rate in milliseconds for input polling.
    pub tick_rate_ms: u64,
    /// Enable mouse capture.
    pub enable_mouse: bool,
    /// Return aborted frames from the run loop instead of logging them.
    pub halt_on_error: bool,
    /// Key that activates the focused control.
    pub activation_key: Key,
    /// Glyph atlas geometry handed to renderers.
    pub metrics: GlyphMetrics,
    /// Color mode (auto-detected if not specified).
    pub color_mode: Option<ColorMode>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            tick_rate_ms: 250,
            enable_mouse: true,
            halt_on_error: false,
            activation_key: Key::Enter,
            metrics: GlyphMetrics::default(),
            color_mode: None,
        }
    }
}

impl UiConfig {
    /// Config for a `width` x `height` grid.
    #[must_use]
    pub fn sized(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Create a high-performance config (fast tick).
    #[must_use]
    pub fn high_performance() -> Self {
        Self {
            tick_rate_ms: 16,
            ..Default::default()
        }
    }

    /// Create a power-saving config (slow tick).
    #[must_use]
    pub fn power_saving() -> Self {
        Self {
            tick_rate_ms: 100,
            ..Default::default()
        }
    }

    /// Override the activation key.
    #[must_use]
    pub const fn with_activation_key(mut self, key: Key) -> Self {
        self.activation_key = key;
        self
    }

    /// Abort the run loop on the first failed frame.
    #[must_use]
    pub const fn with_halt_on_error(mut self, halt: bool) -> Self {
        self.halt_on_error = halt;
        self
    }
}
