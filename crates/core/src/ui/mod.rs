//! User interface components for whirl.
//!
//! This module provides the overlay surface the user drags a selection on.
//! It runs in its own process and talks to the controller only through
//! [`crate::message::OverlayMessage`]s.
//!
//! # Architecture
//!
//! - [`selection`]: turning pointer input into messages
//! - [`rendering`]: dimming, cutout and border drawing
//! - [`overlay`]: the `eframe::App` and window setup
//!
//! # Usage
//!
//! ```ignore
//! use whirl_core::ui::{self, StdoutOutput};
//!
//! ui::run_overlay(Box::new(StdoutOutput))?;
//! ```

mod overlay;
mod rendering;
mod selection;

pub use overlay::{MessageOutput, OverlayApp, StdoutOutput};
pub use selection::{DragTracker, PointerInput};

use crate::error::Result;

/// Launches the overlay and returns when it closes.
///
/// Messages are delivered to `output` as they happen; nothing is returned
/// at the end.
pub fn run_overlay(output: Box<dyn MessageOutput>) -> Result<()> {
    overlay::run(output)
}
