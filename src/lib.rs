//! Form Upload System - upload, search and download forms on a remote file service.
//!
//! This library provides the client configuration, the HTTP client for the
//! file service, and the egui form view driving upload/search/download.

pub mod config;
pub mod client;
pub mod ui;

use thiserror::Error;

/// Error types covering all failure modes of the form client.
#[derive(Error, Debug)]
pub enum FormError {
    /// Configuration errors (bad server URL, unreadable config)
    #[error("Config error: {0}")]
    Config(String),

    /// Transport errors (connection refused, timeout, request build)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The file service answered with a non-2xx status
    #[error("{endpoint} returned HTTP {status}")]
    Status { status: u16, endpoint: String },

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Desktop actions (browser launch, clipboard)
    #[error("Action failed: {0}")]
    Action(String),

    /// I/O errors (reading files for upload, log directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using FormError
pub type Result<T> = std::result::Result<T, FormError>;
