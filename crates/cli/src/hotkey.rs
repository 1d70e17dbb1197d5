//! Global keyboard listener.
//!
//! rdev reports raw key presses and releases; [`ChordTracker`] turns them
//! into the two signals the controller cares about.

use rdev::{EventType, Key};
use std::sync::mpsc::Sender;
use whirl_core::ControllerEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeySignal {
    /// Cmd+Shift+C (Ctrl+Shift+C off macOS) went down.
    Toggle,
    Escape,
}

impl From<HotkeySignal> for ControllerEvent {
    fn from(signal: HotkeySignal) -> Self {
        match signal {
            HotkeySignal::Toggle => ControllerEvent::Hotkey,
            HotkeySignal::Escape => ControllerEvent::Escape,
        }
    }
}

/// Modifier state plus edge detection for the trigger key.
#[derive(Debug, Default)]
pub struct ChordTracker {
    command: bool,
    control: bool,
    shift: bool,
    trigger_down: bool,
}

impl ChordTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one raw event. Auto-repeat of a held chord fires only once.
    pub fn observe(&mut self, event: &EventType) -> Option<HotkeySignal> {
        match event {
            EventType::KeyPress(key) => self.press(*key),
            EventType::KeyRelease(key) => {
                self.release(*key);
                None
            }
            _ => None,
        }
    }

    fn press(&mut self, key: Key) -> Option<HotkeySignal> {
        match key {
            Key::MetaLeft | Key::MetaRight => self.command = true,
            Key::ControlLeft | Key::ControlRight => self.control = true,
            Key::ShiftLeft | Key::ShiftRight => self.shift = true,
            Key::KeyC => {
                let repeat = self.trigger_down;
                self.trigger_down = true;
                if !repeat && self.chord_held() {
                    return Some(HotkeySignal::Toggle);
                }
            }
            Key::Escape => return Some(HotkeySignal::Escape),
            _ => {}
        }
        None
    }

    fn release(&mut self, key: Key) {
        match key {
            Key::MetaLeft | Key::MetaRight => self.command = false,
            Key::ControlLeft | Key::ControlRight => self.control = false,
            Key::ShiftLeft | Key::ShiftRight => self.shift = false,
            Key::KeyC => self.trigger_down = false,
            _ => {}
        }
    }

    fn chord_held(&self) -> bool {
        let primary = if cfg!(target_os = "macos") {
            self.command
        } else {
            self.control
        };
        primary && self.shift
    }
}

/// Listens for the shortcut on the calling thread.
///
/// Must be called from the main thread: on macOS rdev resolves key names
/// through input-source APIs that only work there. Blocks for the life of
/// the process and returns only if the listener could not be registered
/// (missing accessibility permission, no X server).
pub fn listen(events: Sender<ControllerEvent>) {
    let mut tracker = ChordTracker::new();
    let result = rdev::listen(move |event| {
        if let Some(signal) = tracker.observe(&event.event_type) {
            log::debug!("hotkey: {:?}", signal);
            if events.send(signal.into()).is_err() {
                log::debug!("controller gone, dropping {:?}", signal);
            }
        }
    });

    if let Err(e) = result {
        log::error!("Failed to register global shortcut: {:?}", e);
    }
}
