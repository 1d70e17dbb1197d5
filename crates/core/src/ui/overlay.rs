//! The overlay surface application.
//!
//! This struct implements the `eframe::App` trait for a transparent,
//! borderless window covering the primary display. It never captures the
//! screen itself; it only reports where the user dragged.

use super::rendering::{
    draw_dim, draw_selection_border, draw_selection_overlay, draw_size_label, IDLE_DIM_ALPHA,
    SELECTION_DIM_ALPHA,
};
use super::selection::{read_input, DragTracker};
use crate::capture::ScreenCapturer;
use crate::error::{AppError, Result};
use crate::message::OverlayMessage;
use eframe::egui;
use std::io::Write;

/// Where the overlay delivers its messages.
pub trait MessageOutput {
    fn send(&mut self, message: OverlayMessage) -> Result<()>;
}

/// Writes one JSON line per message to stdout, which the controller reads.
#[derive(Debug, Default)]
pub struct StdoutOutput;

impl MessageOutput for StdoutOutput {
    fn send(&mut self, message: OverlayMessage) -> Result<()> {
        let line = message.to_line()?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        stdout.flush()?;
        Ok(())
    }
}

pub struct OverlayApp {
    tracker: DragTracker,
    output: Box<dyn MessageOutput>,
    focus_requested: bool,
}

impl OverlayApp {
    pub fn new(output: Box<dyn MessageOutput>) -> Self {
        Self {
            tracker: DragTracker::new(),
            output,
            focus_requested: false,
        }
    }

    fn emit(&mut self, messages: Vec<OverlayMessage>) {
        for message in messages {
            log::debug!("overlay -> {:?}", message);
            if let Err(e) = self.output.send(message) {
                // Nobody is listening; close instead of leaving a dead overlay up.
                log::error!("Failed to report {:?}: {}", message, e);
                self.tracker.finish();
                return;
            }
        }
    }
}

impl eframe::App for OverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Escape only reaches us if the window has keyboard focus
        if !self.focus_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
            self.focus_requested = true;
        }
        ctx.set_cursor_icon(egui::CursorIcon::Crosshair);

        // Fullscreen panel with no margins and no fill
        let panel_frame = egui::Frame::default()
            .inner_margin(egui::Margin::same(0))
            .outer_margin(egui::Margin::same(0));

        egui::CentralPanel::default()
            .frame(panel_frame)
            .show(ctx, |ui| {
                let screen_rect = ui.max_rect();
                let response = ui.interact(screen_rect, ui.id(), egui::Sense::click_and_drag());

                for input in read_input(&response, ctx) {
                    let messages = self.tracker.apply(input);
                    self.emit(messages);
                }

                match self.tracker.selection_rect(ctx.pointer_interact_pos()) {
                    Some(selection_rect) => {
                        draw_selection_overlay(
                            ui.painter(),
                            screen_rect,
                            selection_rect,
                            SELECTION_DIM_ALPHA,
                        );
                        draw_selection_border(
                            ui.painter(),
                            selection_rect,
                            2.0,
                            egui::Color32::WHITE,
                        );
                        draw_size_label(ui.painter(), selection_rect);
                    }
                    None => draw_dim(ui.painter(), screen_rect, IDLE_DIM_ALPHA),
                }
            });

        if self.tracker.is_finished() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }
}

/// Shows the overlay and blocks until it closes.
///
/// # Errors
///
/// Returns [`AppError::Ui`] if the window cannot be created.
pub fn run(output: Box<dyn MessageOutput>) -> Result<()> {
    let mut viewport = egui::ViewportBuilder::default()
        .with_title("Whirl")
        .with_decorations(false)
        .with_transparent(true)
        .with_always_on_top()
        .with_taskbar(false)
        .with_resizable(false)
        .with_mouse_passthrough(false)
        .with_position([0.0, 0.0]);

    viewport = match ScreenCapturer::primary_dimensions() {
        Ok((width, height)) => viewport.with_inner_size([width as f32, height as f32]),
        Err(e) => {
            log::warn!("Unknown display size ({}), maximizing overlay", e);
            viewport.with_maximized(true)
        }
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Whirl Overlay",
        options,
        Box::new(move |_cc| Ok(Box::new(OverlayApp::new(output)) as Box<dyn eframe::App>)),
    )
    .map_err(|e| AppError::ui(format!("Failed to run overlay: {}", e)))
}
