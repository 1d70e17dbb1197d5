//! Cropping and encoding of captured screens.
//!
//! # Coordinate Mapping
//!
//! The capture is already normalized to the display's logical size (see
//! [`crate::capture::to_logical_size`]), so a selection maps one-to-one onto
//! image pixels after rounding.

use crate::error::{AppError, Result};
use crate::selection::SelectionRect;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Image processing utilities for the capture pipeline.
pub struct RegionExtractor;

impl RegionExtractor {
    /// Crops the selected region out of a full-screen capture.
    ///
    /// Coordinates are rounded to whole pixels first, so the result is
    /// exactly `round(width) x round(height)`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Extraction`] if the rounded region is empty or
    /// reaches outside the image.
    pub fn extract(original: &DynamicImage, selection: &SelectionRect) -> Result<DynamicImage> {
        let region = selection.to_pixels();

        if region.width == 0 || region.height == 0 {
            return Err(AppError::extraction("Selection area is empty"));
        }

        if !region.fits_within(original.width(), original.height()) {
            return Err(AppError::extraction(format!(
                "Region {}x{} at ({}, {}) is outside the {}x{} screen",
                region.width,
                region.height,
                region.x,
                region.y,
                original.width(),
                original.height()
            )));
        }

        // Crop the image (immutable operation, returns new image)
        Ok(original.crop_imm(region.x, region.y, region.width, region.height))
    }

    /// Encodes an image as PNG bytes.
    pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
        let mut buffer: Vec<u8> = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);

        image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| AppError::extraction(format!("Failed to encode image: {}", e)))?;

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 0, 255])
        }))
    }

    #[test]
    fn test_extract_matches_selection_size() {
        let screen = gradient(800, 600);
        let rect = SelectionRect {
            x: 100.0,
            y: 100.0,
            width: 400.0,
            height: 300.0,
        };

        let cropped = RegionExtractor::extract(&screen, &rect).unwrap();
        assert_eq!(cropped.dimensions(), (400, 300));
        assert_eq!(cropped.get_pixel(0, 0), Rgba([100, 100, 0, 255]));
    }

    #[test]
    fn test_extract_rounds_fractional_coordinates() {
        let screen = gradient(200, 200);
        let rect = SelectionRect {
            x: 10.6,
            y: 4.2,
            width: 20.5,
            height: 11.4,
        };

        let cropped = RegionExtractor::extract(&screen, &rect).unwrap();
        assert_eq!(cropped.dimensions(), (21, 11));
        assert_eq!(cropped.get_pixel(0, 0), Rgba([11, 4, 0, 255]));
    }

    #[test]
    fn test_extract_rejects_out_of_bounds() {
        let screen = gradient(100, 100);
        let rect = SelectionRect {
            x: 50.0,
            y: 50.0,
            width: 60.0,
            height: 20.0,
        };

        let err = RegionExtractor::extract(&screen, &rect).unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[test]
    fn test_extract_rejects_empty_region() {
        let screen = gradient(100, 100);
        let rect = SelectionRect {
            x: 5.0,
            y: 5.0,
            width: 0.4,
            height: 20.0,
        };
        assert!(RegionExtractor::extract(&screen, &rect).is_err());
    }

    #[test]
    fn test_png_encoding_has_signature() {
        let bytes = RegionExtractor::encode_png(&gradient(4, 4)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
