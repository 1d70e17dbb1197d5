//! Whirl Core Library
//!
//! Screen-region capture for visual search: the user draws a box on a
//! transparent overlay, the region is cropped out of a screenshot, put on
//! the clipboard and pasted into Google Lens in the browser.
//!
//! # Overview
//!
//! - **Session control**: the state machine in [`controller`] and [`session`]
//! - **Overlay**: the drag surface in [`ui`], run as a child process via
//!   [`overlay_process`] and speaking [`message`]s
//! - **Pipeline**: [`capture`] → [`image_processing`] → [`scratch`] →
//!   [`clipboard`] → [`search`], chained by [`pipeline`]
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::mpsc::channel;
//! use whirl_core::{CapturePipeline, CaptureServices, Config, Controller, RunMode};
//! use whirl_core::notify::DialogNotifier;
//! use whirl_core::overlay_process::ProcessOverlayLauncher;
//! use whirl_core::pipeline::TokioPipelineRunner;
//!
//! let config = Config::load()?;
//! let runtime = tokio::runtime::Runtime::new()?;
//! let (tx, rx) = channel();
//!
//! let pipeline = CapturePipeline::new(CaptureServices::system(&config), &config);
//! let controller = Controller::new(
//!     ProcessOverlayLauncher::current_exe(tx.clone())?,
//!     TokioPipelineRunner::new(runtime.handle().clone(), pipeline, tx),
//!     DialogNotifier,
//! );
//! controller.run(rx, RunMode::Once)?;
//! ```

pub mod capture;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod error;
pub mod image_processing;
pub mod message;
pub mod notify;
pub mod overlay_process;
pub mod pipeline;
pub mod scratch;
pub mod search;
pub mod selection;
pub mod session;
pub mod ui;

// Re-export primary types for convenience
pub use config::Config;
pub use controller::{Controller, ControllerEvent, Flow, MenuAction, RunMode};
pub use error::{AppError, Result};
pub use message::OverlayMessage;
pub use pipeline::{CapturePipeline, CaptureServices, PipelineOutcome};
pub use selection::{Point, SelectionRect};
pub use session::{CancelReason, SessionOutcome, SessionState};
