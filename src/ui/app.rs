//! Main form application window.
//!
//! Implements eframe::App for the upload/search/download form. Requests run
//! on the tokio runtime and report back through channels polled every frame.

use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui;
use tokio::runtime::Handle;

use crate::client::protocol::{SearchResult, UploadResponse};
use crate::client::FormClient;
use crate::ui::actions;
use crate::ui::dropzone::{self, DropZone};
use crate::ui::results::{result_rows, ResultAction, ResultRow, ResultsView};
use crate::ui::selection::expand_paths;
use crate::ui::state::{FormState, Notice, UploadOutcome};
use crate::Result;

/// A finished search, tagged with its sequence number.
type SearchReply = (u64, Result<Vec<SearchResult>>);

/// Open or copy the download link for a result row.
///
/// Failures are logged here; the caller decides what, if anything, to show.
fn run_link_action(client: &FormClient, action: &ResultAction) -> Result<()> {
    let (id, copy) = match action {
        ResultAction::Download(id) => (id, false),
        ResultAction::CopyLink(id) => (id, true),
    };

    let result = client.download_url(id).and_then(|url| {
        if copy {
            actions::copy_link(&url)
        } else {
            actions::open_download(&url)
        }
    });

    if let Err(e) = &result {
        tracing::error!("Download action failed for {}: {}", id, e);
    }
    result
}

/// Status bar text after a link action.
///
/// Downloads never touch the status bar, whatever the outcome; only copying
/// the link reports back.
fn link_action_status(action: &ResultAction, result: &Result<()>) -> Option<String> {
    match (action, result) {
        (ResultAction::Download(_), _) => None,
        (ResultAction::CopyLink(_), Ok(())) => Some("Download link copied to clipboard".to_string()),
        (ResultAction::CopyLink(_), Err(e)) => Some(e.to_string()),
    }
}

/// The upload/search/download form.
pub struct UploadApp {
    /// Form state (selection, query, results, flags).
    state: FormState,
    /// Display rows for the current results.
    rows: Vec<ResultRow>,
    /// Client for the file service.
    client: FormClient,
    /// Tokio runtime handle for async requests.
    runtime: Handle,
    upload_tx: Sender<Result<UploadResponse>>,
    upload_rx: Receiver<Result<UploadResponse>>,
    search_tx: Sender<SearchReply>,
    search_rx: Receiver<SearchReply>,
    /// Status bar message.
    status: String,
}

impl UploadApp {
    /// Create a new form application.
    pub fn new(_cc: &eframe::CreationContext<'_>, runtime: Handle, client: FormClient) -> Self {
        let (upload_tx, upload_rx) = mpsc::channel();
        let (search_tx, search_rx) = mpsc::channel();

        Self {
            state: FormState::new(),
            rows: Vec::new(),
            client,
            runtime,
            upload_tx,
            upload_rx,
            search_tx,
            search_rx,
            status: "Ready".to_string(),
        }
    }

    /// Submit the selected files, if the upload action is enabled.
    fn start_upload(&mut self, ctx: &egui::Context) {
        let Some(files) = self.state.begin_upload() else {
            return;
        };

        self.status = format!("Uploading {} file(s)...", files.len());

        let client = self.client.clone();
        let tx = self.upload_tx.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let result = client.upload(&files).await;
            let _ = tx.send(result);
            ctx.request_repaint();
        });
    }

    /// Search for `query`.
    fn start_search(&mut self, ctx: &egui::Context, query: String) {
        let ticket = self.state.begin_search_for(query);
        tracing::info!("Searching for {:?} (#{})", ticket.query, ticket.seq);

        let client = self.client.clone();
        let tx = self.search_tx.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let result = client.search(&ticket.query).await;
            let _ = tx.send((ticket.seq, result));
            ctx.request_repaint();
        });
    }

    /// Apply finished uploads and searches.
    fn check_pending(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.upload_rx.try_recv() {
            match self.state.finish_upload(result) {
                UploadOutcome::Succeeded { refresh_query } => {
                    self.status = "Upload complete".to_string();
                    tracing::info!("Refreshing results for {:?}", refresh_query);
                    self.start_search(ctx, refresh_query);
                }
                UploadOutcome::Failed => {
                    self.status = "Upload failed".to_string();
                }
            }
        }

        while let Ok((seq, result)) = self.search_rx.try_recv() {
            if self.state.finish_search(seq, result) {
                self.rows = result_rows(self.state.results());
                self.status = format!("{} file(s) found", self.rows.len());
            }
        }
    }

    /// Track drag hover and replace the selection on drop.
    fn handle_drop(&mut self, ctx: &egui::Context) {
        let events = dropzone::collect_drop_events(ctx);

        if !events.dropped.is_empty() {
            let files = expand_paths(&events.dropped);
            let count = files.len();
            if self.state.drop_files(files) {
                tracing::info!("{} file(s) dropped", count);
            } else {
                tracing::debug!("Ignoring drop while a notice is open");
            }
        } else if events.hovering != self.state.is_dragging() {
            self.state.set_dragging(events.hovering);
        }
    }

    fn handle_result_action(&mut self, action: ResultAction) {
        let result = run_link_action(&self.client, &action);
        if let Some(status) = link_action_status(&action, &result) {
            self.status = status;
        }
    }

    /// Interruptive notification window.
    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.state.notice() else {
            return;
        };

        let title = match notice {
            Notice::Success(_) => "Upload",
            Notice::Error(_) => "Upload error",
        };
        let message = notice.message().to_string();
        let mut dismissed = false;

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(&message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed || ctx.input(|i| i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Escape)) {
            self.state.dismiss_notice();
        }
    }

    fn upload_section(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if DropZone::show(ui, self.state.is_dragging()) {
            if let Some(files) = dropzone::pick_files() {
                tracing::info!("{} file(s) selected", files.len());
                self.state.select_files(files);
            }
        }

        if self.state.selected_files().is_empty() {
            return;
        }

        ui.add_space(8.0);
        ui.strong("Selected Files:");
        for file in self.state.selected_files() {
            ui.label(format!("📄 {}", file.name)).on_hover_text(file.path.display().to_string());
        }

        ui.add_space(4.0);
        let button = egui::Button::new(self.state.upload_button_label());
        if ui.add_enabled(self.state.can_upload(), button).clicked() {
            self.start_upload(ctx);
        }
    }

    fn search_section(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let mut search = false;

        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.state.query)
                    .desired_width(ui.available_width() - 80.0)
                    .hint_text("Search files..."),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                search = true;
            }
            if ui.button("Search").clicked() {
                search = true;
            }
        });

        if search {
            let query = self.state.query.clone();
            self.start_search(ctx, query);
        }

        ui.add_space(8.0);

        if let Some(action) = ResultsView::show(ui, &self.rows) {
            self.handle_result_action(action);
        }
    }
}

impl eframe::App for UploadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply finished requests
        self.check_pending(ctx);

        // Drag hover and drops
        self.handle_drop(ctx);

        let interactive = self.state.is_interactive();

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(self.client.base_url().as_str());
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(interactive, |ui| {
                ui.heading("Form Upload System");
                ui.add_space(12.0);

                self.upload_section(ui, ctx);

                ui.add_space(12.0);
                ui.separator();

                self.search_section(ui, ctx);
            });
        });

        self.show_notice(ctx);
    }
}
