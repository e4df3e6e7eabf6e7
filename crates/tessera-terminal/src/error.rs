//! Error types for tessera-terminal.

use thiserror::Error;

/// Programming errors detected while running a frame.
///
/// Any of these aborts the frame before it is committed; the previously
/// displayed grid stays on screen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiError {
    /// A pop with nothing left to pop (the root entry never pops).
    #[error("cannot pop the {stack} stack past its root")]
    StackUnderflow {
        /// Which stack
        stack: &'static str,
    },

    /// A stack was left non-empty at the end of a frame.
    #[error("{stack} stack unbalanced at end of frame: {depth} entries left")]
    UnbalancedStack {
        /// Which stack
        stack: &'static str,
        /// Entries above the root
        depth: usize,
    },

    /// A focusable control was given an empty id.
    #[error("focusable control requires a non-empty id")]
    MissingId,

    /// A required context value was read with nothing provided.
    #[error("no value provided for context `{token}`")]
    MissingContext {
        /// Token name
        token: &'static str,
    },
}

/// Errors surfaced by the run loop and renderers.
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error from terminal operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A frame was aborted by a programming error.
    #[error("frame aborted: {0}")]
    Ui(#[from] UiError),

    /// Terminal not available.
    #[error("Terminal not available")]
    TerminalNotAvailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_error_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let tui_err: TuiError = io_err.into();
        assert!(matches!(tui_err, TuiError::Io(_)));
        assert!(tui_err.to_string().contains("IO error"));
    }

    #[test]
    fn test_tui_error_from_ui() {
        let tui_err: TuiError = UiError::MissingId.into();
        assert!(matches!(tui_err, TuiError::Ui(UiError::MissingId)));
        assert_eq!(
            tui_err.to_string(),
            "frame aborted: focusable control requires a non-empty id"
        );
    }

    #[test]
    fn test_ui_error_messages() {
        assert_eq!(
            UiError::StackUnderflow {
                stack: "bounding box"
            }
            .to_string(),
            "cannot pop the bounding box stack past its root"
        );
        assert_eq!(
            UiError::UnbalancedStack {
                stack: "layer",
                depth: 2
            }
            .to_string(),
            "layer stack unbalanced at end of frame: 2 entries left"
        );
        assert_eq!(
            UiError::MissingContext { token: "theme" }.to_string(),
            "no value provided for context `theme`"
        );
    }

    #[test]
    fn test_terminal_not_available() {
        assert_eq!(TuiError::TerminalNotAvailable.to_string(), "Terminal not available");
    }
}
