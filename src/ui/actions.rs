//! Download actions for search results.
//!
//! The file itself is never fetched here: the link is handed to the system
//! browser, which performs and reports the download.

use reqwest::Url;

use crate::{FormError, Result};

/// Open a download link in the default browser.
///
/// No response is awaited; success or failure of the download is up to the browser.
///
/// # Errors
/// Returns error if no browser could be launched.
pub fn open_download(url: &Url) -> Result<()> {
    tracing::info!("Opening download link: {}", url);

    opener::open_browser(url.as_str())
        .map_err(|e| FormError::Action(format!("Failed to open {}: {}", url, e)))
}

/// Copy a download link to the system clipboard.
///
/// # Errors
/// Returns error if clipboard access fails.
pub fn copy_link(url: &Url) -> Result<()> {
    tracing::info!("Copying download link to clipboard: {}", url);

    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| FormError::Action(format!("Failed to access clipboard: {}", e)))?;

    clipboard
        .set_text(url.to_string())
        .map_err(|e| FormError::Action(format!("Failed to set clipboard text: {}", e)))
}

// Launching a browser or touching the clipboard needs a desktop session, so
// these are exercised manually rather than in CI.
