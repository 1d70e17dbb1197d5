//! Drawing helpers for the overlay.
//!
//! The overlay is a transparent window, so everything here paints on top of
//! the live desktop: a light dim while waiting, and a darker dim with a clear
//! cutout once a drag is in progress.

use eframe::egui;

/// Dim applied to the whole screen before the drag starts.
pub const IDLE_DIM_ALPHA: u8 = 40;
/// Dim applied around the selection while dragging.
pub const SELECTION_DIM_ALPHA: u8 = 120;

/// The four bands around `selection`: above, below, left and right.
///
/// Together with the selection itself they tile `screen_rect` exactly.
pub fn cutout_regions(screen_rect: egui::Rect, selection_rect: egui::Rect) -> [egui::Rect; 4] {
    let selection = selection_rect.intersect(screen_rect);
    [
        egui::Rect::from_min_max(
            screen_rect.min,
            egui::pos2(screen_rect.max.x, selection.min.y),
        ),
        egui::Rect::from_min_max(
            egui::pos2(screen_rect.min.x, selection.max.y),
            screen_rect.max,
        ),
        egui::Rect::from_min_max(
            egui::pos2(screen_rect.min.x, selection.min.y),
            egui::pos2(selection.min.x, selection.max.y),
        ),
        egui::Rect::from_min_max(
            egui::pos2(selection.max.x, selection.min.y),
            egui::pos2(screen_rect.max.x, selection.max.y),
        ),
    ]
}

/// Dims everything except the selection.
pub fn draw_selection_overlay(
    painter: &egui::Painter,
    screen_rect: egui::Rect,
    selection_rect: egui::Rect,
    alpha: u8,
) {
    let color = egui::Color32::from_black_alpha(alpha);
    for band in cutout_regions(screen_rect, selection_rect) {
        if band.is_positive() {
            painter.rect_filled(band, 0.0, color);
        }
    }
}

pub fn draw_dim(painter: &egui::Painter, screen_rect: egui::Rect, alpha: u8) {
    painter.rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(alpha));
}

pub fn draw_selection_border(
    painter: &egui::Painter,
    selection_rect: egui::Rect,
    stroke_width: f32,
    color: egui::Color32,
) {
    painter.rect_stroke(
        selection_rect,
        0.0,
        egui::Stroke::new(stroke_width, color),
        egui::StrokeKind::Middle,
    );
}

/// Writes the selection size just above its top-left corner (or inside it
/// when the selection touches the top of the screen).
pub fn draw_size_label(painter: &egui::Painter, selection_rect: egui::Rect) {
    let text = format!(
        "{} × {}",
        selection_rect.width().round(),
        selection_rect.height().round()
    );
    let (anchor, align) = if selection_rect.min.y > 20.0 {
        (selection_rect.left_top() - egui::vec2(0.0, 4.0), egui::Align2::LEFT_BOTTOM)
    } else {
        (selection_rect.left_top() + egui::vec2(4.0, 4.0), egui::Align2::LEFT_TOP)
    };
    painter.text(
        anchor,
        align,
        text,
        egui::FontId::monospace(12.0),
        egui::Color32::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(rect: egui::Rect) -> f32 {
        if rect.is_positive() { rect.area() } else { 0.0 }
    }

    #[test]
    fn test_cutout_tiles_screen() {
        let screen = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(800.0, 600.0));
        let selection = egui::Rect::from_min_max(egui::pos2(100.0, 100.0), egui::pos2(500.0, 400.0));

        let bands = cutout_regions(screen, selection);
        let covered: f32 = bands.iter().map(|r| area(*r)).sum::<f32>() + selection.area();

        assert_eq!(covered, screen.area());
        for band in bands {
            assert!(!band.intersects(selection.shrink(0.5)));
        }
    }

    #[test]
    fn test_cutout_at_screen_corner() {
        let screen = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(800.0, 600.0));
        let selection = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(200.0, 100.0));

        let [top, _, left, _] = cutout_regions(screen, selection);
        assert_eq!(area(top), 0.0);
        assert_eq!(area(left), 0.0);
    }
}
