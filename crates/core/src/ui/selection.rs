//! Selection handling for the overlay.
//!
//! egui responses are first reduced to [`PointerInput`]s, which the
//! [`DragTracker`] turns into the messages sent to the controller. Size
//! validation is left to the controller; the overlay reports every release.

use crate::message::OverlayMessage;
use crate::selection::Point;
use eframe::egui;

/// Input the tracker cares about, extracted from one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    /// The primary button went down over the overlay.
    Pressed(egui::Pos2),
    /// egui recognised a drag. Only reported if the press was missed.
    DragStarted(egui::Pos2),
    Moved(egui::Pos2),
    /// The drag ended. The position may be unknown on the release frame.
    Released(Option<egui::Pos2>),
    /// Pressed and released without moving far enough to count as a drag.
    Clicked(egui::Pos2),
    Escape,
}

/// Tracks one drag from press to release.
#[derive(Debug, Default)]
pub struct DragTracker {
    start: Option<egui::Pos2>,
    current: Option<egui::Pos2>,
    finished: bool,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a release or Escape has been reported.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Stops reacting to input, e.g. after the controller went away.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn apply(&mut self, input: PointerInput) -> Vec<OverlayMessage> {
        if self.finished {
            return Vec::new();
        }

        match input {
            PointerInput::Escape => {
                self.finished = true;
                vec![OverlayMessage::CancelCapture]
            }
            PointerInput::Pressed(pos) => {
                self.start = Some(pos);
                self.current = Some(pos);
                vec![OverlayMessage::start(to_point(pos))]
            }
            PointerInput::DragStarted(pos) => {
                if self.start.is_some() {
                    return Vec::new();
                }
                self.start = Some(pos);
                self.current = Some(pos);
                vec![OverlayMessage::start(to_point(pos))]
            }
            PointerInput::Moved(pos) => {
                if self.start.is_some() {
                    self.current = Some(pos);
                }
                Vec::new()
            }
            PointerInput::Released(pos) => {
                let Some(end) = pos.or(self.current) else {
                    return Vec::new();
                };
                if self.start.is_none() {
                    return Vec::new();
                }
                self.current = Some(end);
                self.finished = true;
                vec![OverlayMessage::end(to_point(end))]
            }
            PointerInput::Clicked(pos) => {
                self.current = Some(pos);
                self.finished = true;
                if self.start.is_some() {
                    return vec![OverlayMessage::end(to_point(pos))];
                }
                self.start = Some(pos);
                vec![
                    OverlayMessage::start(to_point(pos)),
                    OverlayMessage::end(to_point(pos)),
                ]
            }
        }
    }

    /// Rectangle to draw this frame.
    ///
    /// While dragging, follows the live pointer when it is known.
    pub fn selection_rect(&self, pointer: Option<egui::Pos2>) -> Option<egui::Rect> {
        let start = self.start?;
        let end = if self.finished {
            self.current?
        } else {
            pointer.or(self.current)?
        };
        Some(egui::Rect::from_two_pos(start, end))
    }
}

fn to_point(pos: egui::Pos2) -> Point {
    Point::new(pos.x as f64, pos.y as f64)
}

/// Reduces this frame's interaction with the overlay to [`PointerInput`]s.
pub fn read_input(response: &egui::Response, ctx: &egui::Context) -> Vec<PointerInput> {
    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        return vec![PointerInput::Escape];
    }

    let mut inputs = Vec::new();

    // Start is reported on mouse-down, before egui decides it is a drag
    let pressed = ctx.input(|i| {
        if i.pointer.primary_pressed() {
            i.pointer.press_origin()
        } else {
            None
        }
    });
    if let Some(origin) = pressed {
        if response.rect.contains(origin) {
            inputs.push(PointerInput::Pressed(origin));
        }
    }

    if response.drag_started() {
        let origin = ctx
            .input(|i| i.pointer.press_origin())
            .or_else(|| response.interact_pointer_pos());
        if let Some(origin) = origin {
            inputs.push(PointerInput::DragStarted(origin));
        }
    }

    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            inputs.push(PointerInput::Moved(pos));
        }
    }

    if response.drag_stopped() {
        let pos = response
            .interact_pointer_pos()
            .or_else(|| ctx.input(|i| i.pointer.latest_pos()));
        inputs.push(PointerInput::Released(pos));
    } else if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            inputs.push(PointerInput::Clicked(pos));
        }
    }

    inputs
}
