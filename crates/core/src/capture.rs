//! Screen capture functionality.
//!
//! Grabs the primary display with the `screenshots` crate and hands back an
//! [`image::DynamicImage`] sized to the display's logical resolution, which
//! is the coordinate space the overlay reports selections in.
//!
//! # Example
//!
//! ```ignore
//! use whirl_core::capture::{ScreenCapturer, ScreenSource};
//!
//! let screenshot = ScreenCapturer.capture_primary()?;
//! ```

use crate::error::{AppError, Result};
use image::imageops::FilterType;
use image::DynamicImage;
use screenshots::Screen;

/// Something that can produce a full-screen image of the primary display.
pub trait ScreenSource: Send + Sync {
    /// Captures the entire primary display.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ScreenEnumeration`] if no display can be found or
    /// the grab fails.
    fn capture_primary(&self) -> Result<DynamicImage>;
}

/// Screen source backed by the operating system.
///
/// Displays are enumerated on every capture so monitors plugged in after
/// startup are picked up.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScreenCapturer;

impl ScreenCapturer {
    fn primary_screen() -> Result<Screen> {
        let mut screens = Screen::all()
            .map_err(|e| AppError::capture(format!("Failed to enumerate screens: {}", e)))?;

        if screens.is_empty() {
            return Err(AppError::capture("No screens detected"));
        }

        let index = screens
            .iter()
            .position(|s| s.display_info.is_primary)
            .unwrap_or(0);

        Ok(screens.swap_remove(index))
    }

    /// Gets the logical dimensions of the primary screen.
    ///
    /// Used to size the overlay window so it covers the whole display.
    pub fn primary_dimensions() -> Result<(u32, u32)> {
        let screen = Self::primary_screen()?;
        Ok((screen.display_info.width, screen.display_info.height))
    }
}

impl ScreenSource for ScreenCapturer {
    fn capture_primary(&self) -> Result<DynamicImage> {
        let screen = Self::primary_screen()?;
        let logical = (screen.display_info.width, screen.display_info.height);

        let captured = screen
            .capture()
            .map_err(|e| AppError::capture(format!("Failed to capture screen: {}", e)))?;

        // Convert screenshots::Image to image::DynamicImage
        let width = captured.width();
        let height = captured.height();
        let rgba_data = captured.into_raw();

        let img_buffer = image::ImageBuffer::from_raw(width, height, rgba_data)
            .ok_or_else(|| AppError::capture("Failed to create image buffer"))?;

        log::debug!(
            "captured {}x{} frame for {}x{} display (scale {})",
            width,
            height,
            logical.0,
            logical.1,
            screen.display_info.scale_factor
        );

        Ok(to_logical_size(DynamicImage::ImageRgba8(img_buffer), logical))
    }
}

/// Scales a HiDPI capture down to the display's logical size.
///
/// Frames that already match (or report a zero-sized display) pass through
/// untouched.
pub fn to_logical_size(image: DynamicImage, (width, height): (u32, u32)) -> DynamicImage {
    if width == 0 || height == 0 || (image.width() == width && image.height() == height) {
        return image;
    }
    image.resize_exact(width, height, FilterType::Triangle)
}
