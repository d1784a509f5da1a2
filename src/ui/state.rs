//! Form state and its transitions.
//!
//! All UI state lives here as plain fields. The app feeds user and network
//! events in and performs whatever side effect the transition returns
//! (start a request, show a notice). Nothing here touches the network.

use crate::client::protocol::{SearchResult, UploadResponse};
use crate::ui::selection::SelectedFile;
use crate::Result;

/// Confirmation shown after a successful upload.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Files uploaded successfully!";

/// Notification shown after a failed upload.
pub const UPLOAD_ERROR_MESSAGE: &str = "Error uploading files";

/// Interruptive notification, shown until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Success(msg) | Notice::Error(msg) => msg,
        }
    }
}

/// What the app should do after an upload completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Selection was cleared; re-run the search for this query.
    Succeeded { refresh_query: String },
    /// Selection is kept for a retry.
    Failed,
}

/// A search that has been issued but not yet answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub query: String,
}

/// State of the upload/search form.
#[derive(Debug, Default)]
pub struct FormState {
    /// Files waiting for upload, in selection order.
    selected_files: Vec<SelectedFile>,
    /// Search text as typed.
    pub query: String,
    /// Results of the most recently applied search.
    results: Vec<SearchResult>,
    /// True between upload submission and completion.
    uploading: bool,
    /// True while files are dragged over the window.
    dragging: bool,
    /// Pending notification, if any.
    notice: Option<Notice>,
    /// Sequence number handed to the last issued search.
    last_issued_search: u64,
    /// Sequence number of the search whose results are shown.
    last_applied_search: u64,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_files(&self) -> &[SelectedFile] {
        &self.selected_files
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Replace the selection with files from the picker.
    pub fn select_files(&mut self, files: Vec<SelectedFile>) {
        self.selected_files = files;
    }

    /// Whether the form takes input. A pending notice blocks everything else.
    pub fn is_interactive(&self) -> bool {
        self.notice.is_none()
    }

    /// Drag hover entered or left the drop surface.
    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging && self.is_interactive();
    }

    /// Files were dropped: they replace the current selection.
    ///
    /// Drops behind a pending notice are ignored. Returns whether the
    /// selection was replaced.
    pub fn drop_files(&mut self, files: Vec<SelectedFile>) -> bool {
        self.dragging = false;
        if !self.is_interactive() {
            return false;
        }
        self.selected_files = files;
        true
    }

    /// Whether the upload button is enabled.
    pub fn can_upload(&self) -> bool {
        !self.selected_files.is_empty() && !self.uploading
    }

    pub fn upload_button_label(&self) -> &'static str {
        if self.uploading {
            "Uploading..."
        } else {
            "Upload Files"
        }
    }

    /// Enter the uploading state and return the files to send.
    ///
    /// Returns `None` (and changes nothing) when the upload action is disabled.
    pub fn begin_upload(&mut self) -> Option<Vec<SelectedFile>> {
        if !self.can_upload() {
            return None;
        }
        self.uploading = true;
        Some(self.selected_files.clone())
    }

    /// Leave the uploading state with the request's result.
    pub fn finish_upload(&mut self, result: Result<UploadResponse>) -> UploadOutcome {
        self.uploading = false;

        match result {
            Ok(response) => {
                tracing::info!(
                    "Upload complete: {} file(s) stored{}",
                    response.files.len(),
                    response.message.map(|m| format!(" ({})", m)).unwrap_or_default()
                );
                self.selected_files.clear();
                self.notice = Some(Notice::Success(UPLOAD_SUCCESS_MESSAGE.to_string()));
                UploadOutcome::Succeeded {
                    refresh_query: self.query.clone(),
                }
            }
            Err(e) => {
                tracing::error!("Upload failed: {}", e);
                self.notice = Some(Notice::Error(UPLOAD_ERROR_MESSAGE.to_string()));
                UploadOutcome::Failed
            }
        }
    }

    /// Issue a search for the current query text.
    pub fn begin_search(&mut self) -> SearchTicket {
        let query = self.query.clone();
        self.begin_search_for(query)
    }

    /// Issue a search for a given query, e.g. the refresh after an upload.
    pub fn begin_search_for(&mut self, query: String) -> SearchTicket {
        self.last_issued_search += 1;
        SearchTicket {
            seq: self.last_issued_search,
            query,
        }
    }

    /// Apply a search response.
    ///
    /// Results are replaced verbatim. Failures keep the previous results and
    /// are only logged. A response older than the one already shown is
    /// dropped. Returns whether the results changed.
    pub fn finish_search(&mut self, seq: u64, result: Result<Vec<SearchResult>>) -> bool {
        match result {
            Ok(results) if seq > self.last_applied_search => {
                self.last_applied_search = seq;
                self.results = results;
                true
            }
            Ok(_) => {
                tracing::debug!(
                    "Dropping stale search response #{} (showing #{})",
                    seq,
                    self.last_applied_search
                );
                false
            }
            Err(e) => {
                tracing::error!("Search failed: {}", e);
                false
            }
        }
    }
}
