//! Running the overlay surface as a child process.
//!
//! The controller re-executes its own binary with the `overlay` subcommand.
//! The child writes [`OverlayMessage`] lines to stdout; a reader thread turns
//! them into [`ControllerEvent`]s tagged with the session they belong to.

use crate::controller::ControllerEvent;
use crate::error::{AppError, Result};
use crate::message::OverlayMessage;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::Sender;
use std::thread;

/// Subcommand the child process is started with.
pub const OVERLAY_SUBCOMMAND: &str = "overlay";

/// A live overlay owned by the controller.
pub trait OverlaySurface {
    /// Removes the overlay from the screen. Calling it again does nothing.
    fn close(&mut self);
}

/// Creates overlay surfaces for new sessions.
pub trait OverlayLauncher {
    fn launch(&mut self, session: u64) -> Result<Box<dyn OverlaySurface>>;
}

/// Launches `<program> overlay` and forwards its messages to the controller.
pub struct ProcessOverlayLauncher {
    program: PathBuf,
    events: Sender<ControllerEvent>,
}

impl ProcessOverlayLauncher {
    pub fn new(program: impl Into<PathBuf>, events: Sender<ControllerEvent>) -> Self {
        Self {
            program: program.into(),
            events,
        }
    }

    /// Uses the currently running executable as the overlay program.
    pub fn current_exe(events: Sender<ControllerEvent>) -> Result<Self> {
        let program = std::env::current_exe()
            .map_err(|e| AppError::overlay(format!("Cannot locate own executable: {}", e)))?;
        Ok(Self::new(program, events))
    }
}

impl OverlayLauncher for ProcessOverlayLauncher {
    fn launch(&mut self, session: u64) -> Result<Box<dyn OverlaySurface>> {
        let mut child = Command::new(&self.program)
            .arg(OVERLAY_SUBCOMMAND)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                AppError::overlay(format!("Failed to start {}: {}", self.program.display(), e))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AppError::overlay("Overlay stdout was not captured"))?;

        let events = self.events.clone();
        thread::Builder::new()
            .name(format!("overlay-{session}"))
            .spawn(move || forward_messages(session, BufReader::new(stdout), events))
            .map_err(|e| AppError::overlay(format!("Failed to start reader thread: {}", e)))?;

        log::debug!("overlay for session {} started (pid {})", session, child.id());
        Ok(Box::new(ChildOverlay { child: Some(child) }))
    }
}

/// Reads message lines until EOF, then reports the overlay as closed.
pub fn forward_messages<R: BufRead>(session: u64, reader: R, events: Sender<ControllerEvent>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::warn!("overlay read failed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match OverlayMessage::from_line(&line) {
            Ok(message) => {
                if events
                    .send(ControllerEvent::Overlay { session, message })
                    .is_err()
                {
                    return;
                }
            }
            Err(e) => log::warn!("ignoring overlay output {:?}: {}", line, e),
        }
    }
    let _ = events.send(ControllerEvent::OverlayClosed { session });
}

struct ChildOverlay {
    child: Option<Child>,
}

impl OverlaySurface for ChildOverlay {
    fn close(&mut self) {
        if let Some(mut child) = self.child.take() {
            // Already exited on its own after end-capture/cancel-capture.
            if let Err(e) = child.kill() {
                log::debug!("overlay kill: {}", e);
            }
            match child.wait() {
                Ok(status) => log::debug!("overlay exited with {}", status),
                Err(e) => log::warn!("Failed to reap overlay process: {}", e),
            }
        }
    }
}

impl Drop for ChildOverlay {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::mpsc::channel;

    #[test]
    fn test_forward_messages_in_order_then_closed() {
        let (tx, rx) = channel();
        let input = "{\"kind\":\"start-capture\",\"x\":100,\"y\":100}\n\
                     \n\
                     not json\n\
                     {\"kind\":\"end-capture\",\"x\":500,\"y\":400}\n";

        forward_messages(4, Cursor::new(input), tx);

        let events: Vec<ControllerEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[0],
            ControllerEvent::Overlay {
                session: 4,
                message: OverlayMessage::StartCapture { x, y }
            } if x == 100.0 && y == 100.0
        ));
        assert!(matches!(
            events[1],
            ControllerEvent::Overlay {
                session: 4,
                message: OverlayMessage::EndCapture { x, y }
            } if x == 500.0 && y == 400.0
        ));
        assert!(matches!(events[2], ControllerEvent::OverlayClosed { session: 4 }));
    }

    #[test]
    fn test_missing_program_is_overlay_error() {
        let (tx, _rx) = channel();
        let mut launcher = ProcessOverlayLauncher::new("/nonexistent/whirl-overlay", tx);
        match launcher.launch(1) {
            Err(AppError::Overlay(msg)) => assert!(msg.contains("/nonexistent/whirl-overlay")),
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("launch should fail"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_close_is_idempotent() {
        let child = Command::new("sleep")
            .arg("30")
            .stdout(Stdio::null())
            .spawn()
            .unwrap();
        let mut overlay = ChildOverlay { child: Some(child) };
        overlay.close();
        assert!(overlay.child.is_none());
        overlay.close();
    }
}
