//! Drop surface and file picker.
//!
//! Files reach the form either by dropping them on the window or through the
//! native multi-select dialog opened by clicking the surface.

use std::path::PathBuf;

use eframe::egui::{self, Sense};

use crate::ui::selection::{expand_paths, SelectedFile};

const SURFACE_HEIGHT: f32 = 120.0;

/// Drag-and-drop activity observed in one frame.
#[derive(Debug, Default)]
pub struct DropEvents {
    /// Files are currently hovering over the window.
    pub hovering: bool,
    /// Paths dropped this frame (empty if nothing was dropped).
    pub dropped: Vec<PathBuf>,
}

/// Collect OS drag-and-drop input for this frame.
pub fn collect_drop_events(ctx: &egui::Context) -> DropEvents {
    ctx.input(|i| DropEvents {
        hovering: !i.raw.hovered_files.is_empty(),
        dropped: i
            .raw
            .dropped_files
            .iter()
            .filter_map(|f| f.path.clone())
            .collect(),
    })
}

/// Open the native multi-select file dialog.
///
/// Returns `None` if the dialog was cancelled.
pub fn pick_files() -> Option<Vec<SelectedFile>> {
    rfd::FileDialog::new()
        .set_title("Select files to upload")
        .pick_files()
        .map(expand_paths)
}

/// The dashed drop surface.
pub struct DropZone;

impl DropZone {
    /// Draw the drop surface. Returns true if it was clicked.
    pub fn show(ui: &mut egui::Ui, dragging: bool) -> bool {
        let size = egui::vec2(ui.available_width(), SURFACE_HEIGHT);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        let visuals = ui.visuals();
        let (stroke_color, fill) = if dragging {
            (visuals.selection.stroke.color, visuals.selection.bg_fill.gamma_multiply(0.2))
        } else if response.hovered() {
            (visuals.selection.stroke.color, egui::Color32::TRANSPARENT)
        } else {
            (visuals.weak_text_color(), egui::Color32::TRANSPARENT)
        };

        let painter = ui.painter();
        painter.rect_filled(rect, 8.0, fill);
        painter.rect_stroke(rect, 8.0, egui::Stroke::new(2.0, stroke_color));

        let text = if dragging {
            "Drop the files here"
        } else {
            "Drag and drop files here, or click to select files"
        };
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(16.0),
            visuals.text_color(),
        );

        response.on_hover_cursor(egui::CursorIcon::PointingHand).clicked()
    }
}
