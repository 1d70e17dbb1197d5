//! The session controller.
//!
//! Owns the session state and the overlay, and is the only place where the
//! state changes. All input (hotkey, menu, overlay messages, pipeline
//! results) arrives as [`ControllerEvent`]s on one channel and is handled on
//! one thread, so sessions can never overlap.

use crate::error::{AppError, Result};
use crate::message::OverlayMessage;
use crate::notify::Notifier;
use crate::overlay_process::{OverlayLauncher, OverlaySurface};
use crate::pipeline::{PipelineOutcome, PipelineRunner};
use crate::selection::{Point, SelectionRect};
use crate::session::{CancelReason, SessionOutcome, SessionState};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

/// Menu actions, equivalent to the tray menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Same as the hotkey: start a session, or cancel the current one.
    Search,
    About,
    Quit,
}

impl FromStr for MenuAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "search" => Ok(Self::Search),
            "about" => Ok(Self::About),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(AppError::config(format!("Unknown command '{other}'"))),
        }
    }
}

/// Everything the controller reacts to.
#[derive(Debug)]
pub enum ControllerEvent {
    /// The global shortcut fired.
    Hotkey,
    /// Escape was seen by the global keyboard listener.
    Escape,
    Menu(MenuAction),
    Overlay {
        session: u64,
        message: OverlayMessage,
    },
    /// The overlay for `session` stopped producing output.
    OverlayClosed { session: u64 },
    PipelineFinished {
        session: u64,
        result: Result<PipelineOutcome>,
    },
}

/// What the caller should do after an event was handled.
#[derive(Debug)]
pub enum Flow {
    Continue,
    /// A session reached a terminal state.
    Finished(SessionOutcome),
    /// Quit was requested.
    Exit,
}

/// Whether [`Controller::run`] keeps serving sessions or stops after one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Daemon,
    Once,
}

pub struct Controller<L, R, N> {
    state: SessionState,
    overlay: Option<Box<dyn OverlaySurface>>,
    next_session: u64,
    launcher: L,
    runner: R,
    notifier: N,
}

impl<L, R, N> fmt::Debug for Controller<L, R, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.state)
            .field("has_overlay", &self.overlay.is_some())
            .field("next_session", &self.next_session)
            .finish()
    }
}

impl<L, R, N> Controller<L, R, N>
where
    L: OverlayLauncher,
    R: PipelineRunner,
    N: Notifier,
{
    pub fn new(launcher: L, runner: R, notifier: N) -> Self {
        Self {
            state: SessionState::Idle,
            overlay: None,
            next_session: 1,
            launcher,
            runner,
            notifier,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// True from the moment a session starts until it reaches a terminal
    /// state.
    pub fn is_capturing(&self) -> bool {
        !self.state.is_idle()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Handles events until the channel closes or the run mode says stop.
    pub fn run(mut self, events: Receiver<ControllerEvent>, mode: RunMode) -> Result<()> {
        if mode == RunMode::Once {
            if let Flow::Finished(outcome) = self.toggle() {
                self.shutdown();
                return outcome_to_result(outcome);
            }
        }

        for event in events.iter() {
            match self.handle(event) {
                Flow::Continue => {}
                Flow::Finished(outcome) if mode == RunMode::Once => {
                    self.shutdown();
                    return outcome_to_result(outcome);
                }
                Flow::Finished(_) => {}
                Flow::Exit => break,
            }
        }

        self.shutdown();
        Ok(())
    }

    pub fn handle(&mut self, event: ControllerEvent) -> Flow {
        match event {
            ControllerEvent::Hotkey | ControllerEvent::Menu(MenuAction::Search) => self.toggle(),
            ControllerEvent::Menu(MenuAction::About) => {
                self.notifier.about();
                Flow::Continue
            }
            ControllerEvent::Menu(MenuAction::Quit) => {
                log::info!("quit requested");
                self.shutdown();
                Flow::Exit
            }
            ControllerEvent::Escape => match self.state {
                SessionState::Capturing { .. } => self.finish(SessionOutcome::Cancelled(CancelReason::Escape)),
                _ => Flow::Continue,
            },
            ControllerEvent::Overlay { session, message } => self.on_overlay(session, message),
            ControllerEvent::OverlayClosed { session } => {
                match self.state {
                    SessionState::Capturing { session: current, .. } if current == session => {
                        self.finish(SessionOutcome::Cancelled(CancelReason::OverlayClosed))
                    }
                    _ => Flow::Continue,
                }
            }
            ControllerEvent::PipelineFinished { session, result } => {
                self.on_pipeline_finished(session, result)
            }
        }
    }

    /// Cancels whatever is in progress and releases the overlay.
    pub fn shutdown(&mut self) {
        if self.is_capturing() {
            let _ = self.finish(SessionOutcome::Cancelled(CancelReason::Quit));
        }
        self.release_overlay();
    }

    fn toggle(&mut self) -> Flow {
        if self.is_capturing() {
            return self.finish(SessionOutcome::Cancelled(CancelReason::Toggled));
        }

        let session = self.next_session;
        self.next_session += 1;

        match self.launcher.launch(session) {
            Ok(overlay) => {
                log::info!("session {} started", session);
                self.overlay = Some(overlay);
                self.state = SessionState::Capturing {
                    session,
                    drag_start: None,
                };
                Flow::Continue
            }
            Err(e) => {
                log::error!("Failed to open overlay: {}", e);
                self.finish(SessionOutcome::Failed(e))
            }
        }
    }

    fn on_overlay(&mut self, session: u64, message: OverlayMessage) -> Flow {
        let SessionState::Capturing {
            session: current,
            drag_start,
        } = &mut self.state
        else {
            log::debug!("ignoring {:?} outside of a capture", message);
            return Flow::Continue;
        };
        if *current != session {
            log::debug!("ignoring {:?} from stale session {}", message, session);
            return Flow::Continue;
        }

        match message {
            OverlayMessage::StartCapture { x, y } => {
                log::debug!("drag started at ({}, {})", x, y);
                *drag_start = Some(Point::new(x, y));
                Flow::Continue
            }
            OverlayMessage::CancelCapture => {
                self.finish(SessionOutcome::Cancelled(CancelReason::Escape))
            }
            OverlayMessage::EndCapture { x, y } => {
                let Some(start) = *drag_start else {
                    return self.finish(SessionOutcome::Cancelled(CancelReason::NoSelection));
                };
                // Gone before the screen is grabbed.
                self.release_overlay();

                let rect = SelectionRect::from_corners(start, Point::new(x, y));
                match rect.validate() {
                    Ok(rect) => self.begin_processing(session, rect),
                    Err(e) => {
                        log::info!("{}, ignoring", e);
                        self.finish(SessionOutcome::Cancelled(CancelReason::SelectionTooSmall))
                    }
                }
            }
        }
    }

    fn begin_processing(&mut self, session: u64, rect: SelectionRect) -> Flow {
        let cancel = Arc::new(AtomicBool::new(false));
        self.state = SessionState::Processing {
            session,
            rect,
            cancel: Arc::clone(&cancel),
        };
        self.runner.start(session, rect, cancel);
        Flow::Continue
    }

    fn on_pipeline_finished(&mut self, session: u64, result: Result<PipelineOutcome>) -> Flow {
        let is_current = matches!(
            self.state,
            SessionState::Processing { session: current, .. } if current == session
        );
        if !is_current {
            match result {
                Err(e) => log::warn!("session {} failed after it was cancelled: {}", session, e),
                Ok(outcome) => log::debug!("late result for session {}: {:?}", session, outcome),
            }
            return Flow::Continue;
        }

        let outcome = match result {
            Ok(PipelineOutcome::Submitted(region)) => SessionOutcome::Completed(region),
            // Only `finish` raises the cancel flag, and it leaves Processing in
            // the same step, so a current session cannot see this.
            Ok(PipelineOutcome::Aborted(step)) => {
                log::error!("session {} stopped before {} without a cancel", session, step);
                SessionOutcome::Failed(AppError::extraction(format!(
                    "Capture stopped unexpectedly before the {step} step"
                )))
            }
            Err(e) => SessionOutcome::Failed(e),
        };
        self.finish(outcome)
    }

    /// The single exit path for every session.
    fn finish(&mut self, outcome: SessionOutcome) -> Flow {
        self.release_overlay();
        self.state.raise_cancel();
        let session = self.state.session();
        self.state = SessionState::Idle;

        match &outcome {
            SessionOutcome::Completed(region) => log::info!(
                "session {:?} completed: {}x{} sent to search",
                session,
                region.width,
                region.height
            ),
            SessionOutcome::Cancelled(reason) => {
                log::info!("session {:?} cancelled: {}", session, reason)
            }
            SessionOutcome::Failed(e) => {
                log::error!("session {:?} failed: {}", session, e);
                if e.is_user_facing() {
                    self.notifier.error(e.dialog_title(), &e.to_string());
                }
            }
        }

        Flow::Finished(outcome)
    }

    fn release_overlay(&mut self) {
        if let Some(mut overlay) = self.overlay.take() {
            overlay.close();
        }
    }
}

fn outcome_to_result(outcome: SessionOutcome) -> Result<()> {
    match outcome {
        SessionOutcome::Failed(e) => Err(e),
        _ => Ok(()),
    }
}
