//! Search results table.
//!
//! One row per stored file with its name, upload date in local time, and
//! download actions. An empty result set shows a placeholder instead.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::client::protocol::{FileId, SearchResult};

/// Shown in place of the table body when a search returned nothing.
pub const EMPTY_PLACEHOLDER: &str = "No files found";

const ROW_HEIGHT: f32 = 24.0;

/// An action requested from a result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultAction {
    /// Open the download link in the browser
    Download(FileId),
    /// Put the download link on the clipboard
    CopyLink(FileId),
}

/// A result prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub id: FileId,
    pub name: String,
    pub date: String,
}

/// Prepare display rows, one per result, in response order.
pub fn result_rows(results: &[SearchResult]) -> Vec<ResultRow> {
    results
        .iter()
        .map(|r| ResultRow {
            id: r.id.clone(),
            name: r.original_name.clone(),
            date: format_upload_date(&r.upload_date),
        })
        .collect()
}

/// Text shown in place of the table body, if any.
pub fn placeholder(rows: &[ResultRow]) -> Option<&'static str> {
    if rows.is_empty() {
        Some(EMPTY_PLACEHOLDER)
    } else {
        None
    }
}

/// View for displaying search results.
pub struct ResultsView;

impl ResultsView {
    /// Display the results table.
    ///
    /// Returns the action clicked in this frame, if any.
    pub fn show(ui: &mut egui::Ui, rows: &[ResultRow]) -> Option<ResultAction> {
        let mut action = None;

        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::remainder().at_least(200.0).clip(true))
            .column(Column::auto().at_least(150.0))
            .column(Column::auto().at_least(140.0))
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("File Name");
                });
                header.col(|ui| {
                    ui.strong("Upload Date");
                });
                header.col(|ui| {
                    ui.strong("Action");
                });
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let Some(result) = rows.get(row.index()) else {
                        return;
                    };

                    row.col(|ui| {
                        ui.label(&result.name);
                    });
                    row.col(|ui| {
                        ui.weak(&result.date);
                    });
                    row.col(|ui| {
                        if ui.button("Download").clicked() {
                            action = Some(ResultAction::Download(result.id.clone()));
                        }
                        if ui.small_button("Copy link").clicked() {
                            action = Some(ResultAction::CopyLink(result.id.clone()));
                        }
                    });
                });
            });

        if let Some(text) = placeholder(rows) {
            ui.add_space(16.0);
            ui.vertical_centered(|ui| {
                ui.weak(text);
            });
        }

        action
    }
}

/// Parse an upload timestamp into local time.
///
/// Accepts RFC 3339 (`2024-01-01T00:00:00Z`) and offset-less ISO forms with
/// either `T` or a space separator (`2024-01-01 12:30:00.123456`), the latter
/// taken as local time.
pub fn parse_upload_date(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
}

/// Format an upload timestamp for display.
///
/// Format: "2024-01-15 14:30:00" in local time, "---" if unparseable.
pub fn format_upload_date(raw: &str) -> String {
    match parse_upload_date(raw) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "---".to_string(),
    }
}
