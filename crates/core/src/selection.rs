//! Selection geometry.
//!
//! The overlay reports the point where the drag began and the point where it
//! ended. These types turn the pair into a normalized rectangle, decide
//! whether it is a deliberate selection, and round it to whole pixels for
//! cropping.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Minimum width and height (in pixels) for a selection to count.
///
/// Anything smaller is treated as an accidental click.
pub const MIN_SELECTION_SIZE: f64 = 10.0;

/// A position in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The region the user drew, in the primary display's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    /// Builds a rectangle from two opposite corners.
    ///
    /// Users can drag in any direction, so the corners are normalized to a
    /// top-left origin with non-negative dimensions. Coordinates are clamped
    /// at zero.
    pub fn from_corners(start: Point, end: Point) -> Self {
        let left = start.x.min(end.x).max(0.0);
        let top = start.y.min(end.y).max(0.0);
        let right = start.x.max(end.x).max(0.0);
        let bottom = start.y.max(end.y).max(0.0);

        Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Whether both dimensions reach [`MIN_SELECTION_SIZE`].
    pub fn meets_minimum(&self) -> bool {
        self.width >= MIN_SELECTION_SIZE && self.height >= MIN_SELECTION_SIZE
    }

    /// Returns the rectangle if it is large enough to extract.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SelectionTooSmall`] for undersized selections.
    pub fn validate(self) -> Result<Self> {
        if self.meets_minimum() {
            Ok(self)
        } else {
            Err(AppError::SelectionTooSmall {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Rounds every component to the nearest whole pixel.
    pub fn to_pixels(&self) -> PixelRegion {
        PixelRegion {
            x: round_px(self.x),
            y: round_px(self.y),
            width: round_px(self.width),
            height: round_px(self.height),
        }
    }
}

fn round_px(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

/// An integer pixel region ready for cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRegion {
    /// Whether the region lies entirely within an image of the given size.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = self.x as u64 + self.width as u64;
        let bottom = self.y as u64 + self.height as u64;
        right <= width as u64 && bottom <= height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_from_drag() {
        let rect = SelectionRect::from_corners(Point::new(100.0, 100.0), Point::new(500.0, 400.0));
        assert_eq!(
            rect,
            SelectionRect {
                x: 100.0,
                y: 100.0,
                width: 400.0,
                height: 300.0
            }
        );
        assert!(rect.validate().is_ok());
    }

    #[test]
    fn test_reverse_drag_is_normalized() {
        let rect = SelectionRect::from_corners(Point::new(500.0, 400.0), Point::new(100.0, 100.0));
        assert_eq!(rect.x, 100.0);
        assert_eq!(rect.y, 100.0);
        assert_eq!(rect.width, 400.0);
        assert_eq!(rect.height, 300.0);
    }

    #[test]
    fn test_small_selection_is_rejected() {
        let rect = SelectionRect::from_corners(Point::new(100.0, 100.0), Point::new(104.0, 103.0));
        match rect.validate() {
            Err(AppError::SelectionTooSmall { width, height }) => {
                assert_eq!(width, 4.0);
                assert_eq!(height, 3.0);
            }
            other => panic!("expected SelectionTooSmall, got {other:?}"),
        }
    }

    #[test]
    fn test_minimum_is_inclusive_on_both_axes() {
        let exact = SelectionRect::from_corners(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert!(exact.meets_minimum());

        let thin = SelectionRect::from_corners(Point::new(0.0, 0.0), Point::new(300.0, 9.5));
        assert!(!thin.meets_minimum());

        let narrow = SelectionRect::from_corners(Point::new(0.0, 0.0), Point::new(9.99, 300.0));
        assert!(!narrow.meets_minimum());
    }

    #[test]
    fn test_negative_coordinates_are_clamped() {
        let rect = SelectionRect::from_corners(Point::new(-20.0, -5.0), Point::new(40.0, 30.0));
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 0.0);
        assert_eq!(rect.width, 40.0);
        assert_eq!(rect.height, 30.0);
    }

    #[test]
    fn test_pixel_rounding() {
        let rect = SelectionRect {
            x: 10.4,
            y: 20.6,
            width: 99.5,
            height: 50.49,
        };
        assert_eq!(
            rect.to_pixels(),
            PixelRegion {
                x: 10,
                y: 21,
                width: 100,
                height: 50
            }
        );
    }

    #[test]
    fn test_region_bounds_check() {
        let region = PixelRegion {
            x: 700,
            y: 500,
            width: 100,
            height: 100,
        };
        assert!(region.fits_within(800, 600));
        assert!(!region.fits_within(799, 600));
        assert!(!region.fits_within(800, 599));
    }
}
