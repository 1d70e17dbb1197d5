//! Messages sent from the overlay surface to the controller.
//!
//! The overlay runs as a separate process and writes one JSON object per
//! line to its stdout:
//!
//! ```text
//! {"kind":"start-capture","x":100.0,"y":100.0}
//! {"kind":"end-capture","x":500.0,"y":400.0}
//! {"kind":"cancel-capture"}
//! ```
//!
//! The controller pairs `end-capture` with the preceding `start-capture` to
//! form the selection rectangle.

use crate::error::Result;
use crate::selection::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum OverlayMessage {
    /// Mouse button went down; the drag starts here.
    StartCapture { x: f64, y: f64 },
    /// Mouse button was released here.
    EndCapture { x: f64, y: f64 },
    /// Escape was pressed.
    CancelCapture,
}

impl OverlayMessage {
    pub fn start(point: Point) -> Self {
        Self::StartCapture {
            x: point.x,
            y: point.y,
        }
    }

    pub fn end(point: Point) -> Self {
        Self::EndCapture {
            x: point.x,
            y: point.y,
        }
    }

    /// Encodes the message as a single line (without the trailing newline).
    pub fn to_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line.trim())?)
    }
}
