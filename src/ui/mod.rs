//! Form UI for the file service.
//!
//! Provides the egui upload/search/download view, its state machine, and
//! the drop surface, results table and download actions it is built from.

pub mod app;
pub mod state;
pub mod selection;
pub mod dropzone;
pub mod results;
pub mod actions;

pub use app::UploadApp;
pub use state::FormState;
