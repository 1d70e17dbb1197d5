//! Capture session state.
//!
//! A session moves `Idle → Capturing → Processing → Idle`; the trip back to
//! `Idle` is always reported as a [`SessionOutcome`].

use crate::error::AppError;
use crate::search::CapturedRegion;
use crate::selection::{Point, SelectionRect};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Where the controller currently is in the session lifecycle.
#[derive(Debug, Default)]
pub enum SessionState {
    /// Nothing in progress; the hotkey starts a new session.
    #[default]
    Idle,
    /// The overlay is up and waiting for a drag.
    Capturing {
        session: u64,
        drag_start: Option<Point>,
    },
    /// The overlay is gone and the pipeline is running.
    Processing {
        session: u64,
        rect: SelectionRect,
        cancel: Arc<AtomicBool>,
    },
}

impl SessionState {
    /// Id of the session in progress, if any.
    pub fn session(&self) -> Option<u64> {
        match self {
            Self::Idle => None,
            Self::Capturing { session, .. } | Self::Processing { session, .. } => Some(*session),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Stops a running pipeline before its next step. No-op in other states.
    pub(crate) fn raise_cancel(&self) {
        if let Self::Processing { cancel, .. } = self {
            cancel.store(true, Ordering::SeqCst);
        }
    }
}

/// Why a session was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Escape was pressed.
    Escape,
    /// The hotkey or the Search menu item was triggered again.
    Toggled,
    /// The drawn rectangle was below the minimum size.
    SelectionTooSmall,
    /// The mouse was released without a recorded starting point.
    NoSelection,
    /// The overlay process went away on its own.
    OverlayClosed,
    /// The application is quitting.
    Quit,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Escape => "escape pressed",
            Self::Toggled => "hotkey pressed again",
            Self::SelectionTooSmall => "selection too small",
            Self::NoSelection => "no selection",
            Self::OverlayClosed => "overlay closed",
            Self::Quit => "quitting",
        };
        f.write_str(text)
    }
}

/// How a session ended.
#[derive(Debug)]
pub enum SessionOutcome {
    Completed(CapturedRegion),
    Cancelled(CancelReason),
    Failed(AppError),
}

impl SessionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}
