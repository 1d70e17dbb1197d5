//! Error types for the whirl-core library.
//!
//! Every way a capture session can end badly has its own variant, so the
//! controller can decide whether to stay quiet (an accidental click) or to
//! put a dialog in front of the user.

use thiserror::Error;

/// Errors that can occur within the whirl-core library.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (invalid values in the environment).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The drawn rectangle is below the minimum size and is treated as a click.
    #[error("Selection too small: {width}x{height}")]
    SelectionTooSmall { width: f64, height: f64 },

    /// Displays could not be enumerated or captured.
    #[error("Screen capture failed: {0}")]
    ScreenEnumeration(String),

    /// Cropping, encoding or writing the captured region failed.
    #[error("Failed to extract selection: {0}")]
    Extraction(String),

    /// The system clipboard could not be opened or written.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// The browser could not be launched.
    #[error("Failed to open browser: {0}")]
    ExternalLaunch(String),

    /// The simulated paste keystroke failed.
    #[error("Failed to paste image: {0}")]
    PasteAutomation(String),

    /// The overlay process could not be started or talked to.
    #[error("Overlay error: {0}")]
    Overlay(String),

    /// UI-related errors (rendering, window management).
    #[error("UI error: {0}")]
    Ui(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a screen enumeration error with the given message.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::ScreenEnumeration(msg.into())
    }

    /// Creates an extraction error with the given message.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Creates a clipboard error with the given message.
    pub fn clipboard(msg: impl Into<String>) -> Self {
        Self::Clipboard(msg.into())
    }

    /// Creates an overlay error with the given message.
    pub fn overlay(msg: impl Into<String>) -> Self {
        Self::Overlay(msg.into())
    }

    /// Creates a UI error with the given message.
    pub fn ui(msg: impl Into<String>) -> Self {
        Self::Ui(msg.into())
    }

    /// Whether the user should see a dialog for this error.
    ///
    /// Undersized selections are almost always stray clicks, so they end the
    /// session without any noise.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::SelectionTooSmall { .. })
    }

    /// Title for the error dialog shown to the user.
    pub fn dialog_title(&self) -> &'static str {
        match self {
            Self::ScreenEnumeration(_) | Self::Extraction(_) | Self::Io(_) => "Screenshot Error",
            Self::Clipboard(_) => "Clipboard Error",
            Self::ExternalLaunch(_) => "Upload Error",
            Self::PasteAutomation(_) => "Paste Error",
            Self::Config(_) => "Configuration Error",
            Self::SelectionTooSmall { .. } | Self::Overlay(_) | Self::Ui(_) | Self::Json(_) => {
                "Whirl Error"
            }
        }
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_too_small_is_silent() {
        let err = AppError::SelectionTooSmall {
            width: 4.0,
            height: 3.0,
        };
        assert!(!err.is_user_facing());
        assert_eq!(err.to_string(), "Selection too small: 4x3");
    }

    #[test]
    fn test_pipeline_errors_are_user_facing() {
        let errors = [
            AppError::capture("no displays"),
            AppError::extraction("out of bounds"),
            AppError::clipboard("locked"),
            AppError::ExternalLaunch("open failed".into()),
            AppError::PasteAutomation("osascript failed".into()),
        ];
        for err in &errors {
            assert!(err.is_user_facing(), "{err} should be shown");
        }
    }

    #[test]
    fn test_dialog_titles() {
        assert_eq!(AppError::capture("x").dialog_title(), "Screenshot Error");
        assert_eq!(AppError::extraction("x").dialog_title(), "Screenshot Error");
        assert_eq!(AppError::clipboard("x").dialog_title(), "Clipboard Error");
        assert_eq!(
            AppError::ExternalLaunch("x".into()).dialog_title(),
            "Upload Error"
        );
        assert_eq!(
            AppError::PasteAutomation("x".into()).dialog_title(),
            "Paste Error"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(err.to_string(), "IO error: gone");
    }
}
