//! The capture pipeline: everything that happens after the mouse is released.
//!
//! Steps run strictly one after another. A failure aborts the rest of the
//! chain, and a raised cancel flag stops the chain before the next step
//! starts. A step that is already running (a file write, a browser launch)
//! always runs to completion.

use crate::capture::{ScreenCapturer, ScreenSource};
use crate::clipboard::{ImageClipboard, SystemClipboard};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::image_processing::RegionExtractor;
use crate::scratch::ScratchDir;
use crate::search::{BrowserSearchSink, CapturedRegion, SearchSink};
use crate::selection::SelectionRect;
use image::DynamicImage;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

/// The steps of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    Capture,
    Persist,
    Clipboard,
    Search,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Capture => "capture",
            Self::Persist => "persist",
            Self::Clipboard => "clipboard",
            Self::Search => "search",
        };
        f.write_str(name)
    }
}

/// How a pipeline run ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// The region was captured, copied and handed to the search sink.
    Submitted(CapturedRegion),
    /// The session was cancelled; the given step never started.
    Aborted(PipelineStep),
}

/// The OS capabilities the pipeline drives.
#[derive(Clone)]
pub struct CaptureServices {
    pub screen: Arc<dyn ScreenSource>,
    pub clipboard: Arc<dyn ImageClipboard>,
    pub search: Arc<dyn SearchSink>,
}

impl CaptureServices {
    /// The real screen, clipboard and browser.
    pub fn system(config: &Config) -> Self {
        Self {
            screen: Arc::new(ScreenCapturer),
            clipboard: Arc::new(SystemClipboard),
            search: Arc::new(BrowserSearchSink::from_config(config)),
        }
    }
}

pub struct CapturePipeline {
    services: CaptureServices,
    scratch: ScratchDir,
    overlay_settle: Duration,
    cleanup_delay: Duration,
}

impl CapturePipeline {
    pub fn new(services: CaptureServices, config: &Config) -> Self {
        Self {
            services,
            scratch: ScratchDir::new(&config.scratch_dir),
            overlay_settle: config.overlay_settle,
            cleanup_delay: config.cleanup_delay,
        }
    }

    /// Runs the whole chain for one validated selection.
    pub async fn run(&self, rect: SelectionRect, cancel: &AtomicBool) -> Result<PipelineOutcome> {
        log::info!(
            "capturing {}x{} at ({}, {})",
            rect.width,
            rect.height,
            rect.x,
            rect.y
        );

        // Let the window server finish removing the overlay before grabbing.
        tokio::time::sleep(self.overlay_settle).await;

        if is_cancelled(cancel, PipelineStep::Capture) {
            return Ok(PipelineOutcome::Aborted(PipelineStep::Capture));
        }
        let screen = Arc::clone(&self.services.screen);
        let (cropped, png) = tokio::task::spawn_blocking(move || {
            let full = screen.capture_primary()?;
            let cropped = RegionExtractor::extract(&full, &rect)?;
            let png = RegionExtractor::encode_png(&cropped)?;
            Ok::<_, AppError>((cropped, png))
        })
        .await
        .map_err(|e| AppError::extraction(format!("Capture task failed: {}", e)))??;

        if is_cancelled(cancel, PipelineStep::Persist) {
            return Ok(PipelineOutcome::Aborted(PipelineStep::Persist));
        }
        let path = self.scratch.persist(&png).await?;
        let region = CapturedRegion {
            path,
            width: cropped.width(),
            height: cropped.height(),
        };

        self.hand_off(region, cropped, cancel).await
    }

    /// Clipboard and search for a region that is already on disk.
    async fn hand_off(
        &self,
        region: CapturedRegion,
        cropped: DynamicImage,
        cancel: &AtomicBool,
    ) -> Result<PipelineOutcome> {
        if is_cancelled(cancel, PipelineStep::Clipboard) {
            self.scratch.schedule_cleanup(region.path.clone(), Duration::ZERO);
            return Ok(PipelineOutcome::Aborted(PipelineStep::Clipboard));
        }
        self.copy_to_clipboard(cropped).await?;
        self.scratch
            .schedule_cleanup(region.path.clone(), self.cleanup_delay);

        if is_cancelled(cancel, PipelineStep::Search) {
            return Ok(PipelineOutcome::Aborted(PipelineStep::Search));
        }
        self.services.search.submit(&region).await?;

        Ok(PipelineOutcome::Submitted(region))
    }

    async fn copy_to_clipboard(&self, image: DynamicImage) -> Result<()> {
        let clipboard = Arc::clone(&self.services.clipboard);
        tokio::task::spawn_blocking(move || clipboard.set_image(&image))
            .await
            .map_err(|e| AppError::clipboard(format!("Clipboard task failed: {}", e)))??;
        log::debug!("image copied to clipboard");
        Ok(())
    }
}

fn is_cancelled(cancel: &AtomicBool, next: PipelineStep) -> bool {
    let cancelled = cancel.load(Ordering::SeqCst);
    if cancelled {
        log::info!("session cancelled, skipping {}", next);
    }
    cancelled
}

/// Starts pipeline runs on behalf of the controller.
pub trait PipelineRunner {
    /// Begins processing `rect` for `session`. Completion is reported back to
    /// the controller asynchronously.
    fn start(&mut self, session: u64, rect: SelectionRect, cancel: Arc<AtomicBool>);
}

/// Runs pipelines on a tokio runtime and posts the result back as a
/// [`crate::controller::ControllerEvent::PipelineFinished`].
pub struct TokioPipelineRunner {
    handle: tokio::runtime::Handle,
    pipeline: Arc<CapturePipeline>,
    events: Sender<crate::controller::ControllerEvent>,
}

impl TokioPipelineRunner {
    pub fn new(
        handle: tokio::runtime::Handle,
        pipeline: CapturePipeline,
        events: Sender<crate::controller::ControllerEvent>,
    ) -> Self {
        Self {
            handle,
            pipeline: Arc::new(pipeline),
            events,
        }
    }
}

impl PipelineRunner for TokioPipelineRunner {
    fn start(&mut self, session: u64, rect: SelectionRect, cancel: Arc<AtomicBool>) {
        let pipeline = Arc::clone(&self.pipeline);
        let events = self.events.clone();
        self.handle.spawn(async move {
            let result = pipeline.run(rect, &cancel).await;
            let event = crate::controller::ControllerEvent::PipelineFinished { session, result };
            if events.send(event).is_err() {
                log::debug!("controller gone before session {} finished", session);
            }
        });
    }
}
