//! Clipboard handoff for captured regions.
//!
//! The search page reads the image from the system clipboard, so the crop is
//! written there as raw RGBA before the browser is opened.

use crate::error::{AppError, Result};
use image::DynamicImage;
use std::borrow::Cow;

/// Trait for image clipboard operations, allowing for mocking in tests
pub trait ImageClipboard: Send + Sync {
    fn set_image(&self, image: &DynamicImage) -> Result<()>;
}

/// System clipboard implementation using arboard
///
/// A fresh handle is opened per write; the clipboard has a single image
/// slot that each session overwrites.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ImageClipboard for SystemClipboard {
    fn set_image(&self, image: &DynamicImage) -> Result<()> {
        let rgba = image.to_rgba8();
        let data = arboard::ImageData {
            width: rgba.width() as usize,
            height: rgba.height() as usize,
            bytes: Cow::Owned(rgba.into_raw()),
        };

        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| AppError::clipboard(e.to_string()))?;
        clipboard
            .set_image(data)
            .map_err(|e| AppError::clipboard(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use std::sync::Mutex;

    /// Mock clipboard for testing
    struct MockClipboard {
        content: Mutex<Option<(u32, u32)>>,
        should_fail: bool,
    }

    impl MockClipboard {
        fn new() -> Self {
            Self {
                content: Mutex::new(None),
                should_fail: false,
            }
        }

        fn with_failure() -> Self {
            Self {
                content: Mutex::new(None),
                should_fail: true,
            }
        }
    }

    impl ImageClipboard for MockClipboard {
        fn set_image(&self, image: &DynamicImage) -> Result<()> {
            if self.should_fail {
                return Err(AppError::clipboard("Mock clipboard failure"));
            }
            *self.content.lock().unwrap() = Some((image.width(), image.height()));
            Ok(())
        }
    }

    #[test]
    fn test_mock_clipboard_overwrites_slot() {
        let clipboard = MockClipboard::new();
        let boxed: &dyn ImageClipboard = &clipboard;

        boxed.set_image(&DynamicImage::ImageRgba8(RgbaImage::new(4, 3))).unwrap();
        boxed.set_image(&DynamicImage::ImageRgba8(RgbaImage::new(40, 30))).unwrap();

        assert_eq!(*clipboard.content.lock().unwrap(), Some((40, 30)));
    }

    #[test]
    fn test_mock_clipboard_failure() {
        let clipboard = MockClipboard::with_failure();
        let err = clipboard
            .set_image(&DynamicImage::ImageRgba8(RgbaImage::new(1, 1)))
            .unwrap_err();
        assert!(matches!(err, AppError::Clipboard(_)));
        assert_eq!(err.to_string(), "Clipboard error: Mock clipboard failure");
    }
}
