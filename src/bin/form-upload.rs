//! Form Upload System - desktop client for the file service.
//!
//! This binary provides the user-facing form:
//! - Drag-and-drop or pick files, upload them in one request
//! - Search stored files by name
//! - Open or copy download links
//!
//! Logs go to stderr and to `<data_dir>/logs/form-upload.log`.

use anyhow::Context;
use eframe::egui;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use form_upload::client::FormClient;
use form_upload::config::ClientConfig;
use form_upload::ui::UploadApp;

/// Initialize tracing with stderr output and a daily rotating log file.
///
/// The returned guard flushes the file writer on drop.
fn init_logging(config: &ClientConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "form_upload=info".to_string()),
    );

    let log_dir = config.log_dir();
    let (file_layer, guard) = match std::fs::create_dir_all(&log_dir) {
        Ok(()) => {
            let file_appender = tracing_appender::rolling::daily(&log_dir, "form-upload.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false); // No ANSI colors in log files
            (Some(layer), Some(guard))
        }
        Err(e) => {
            // Fall back to stderr logging only
            eprintln!("Failed to create log directory {:?}: {}", log_dir, e);
            (None, None)
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

fn main() -> anyhow::Result<()> {
    let config = ClientConfig::load();
    let _guard = init_logging(&config);

    info!(
        "Form Upload v{} starting (server: {})",
        env!("CARGO_PKG_VERSION"),
        config.server_url
    );

    let client = FormClient::new(&config).context("Invalid client configuration")?;

    // Runtime for HTTP requests; must outlive the UI
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Form Upload System")
            .with_inner_size([800.0, 600.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Form Upload System",
        options,
        Box::new(move |cc| Ok(Box::new(UploadApp::new(cc, handle, client)))),
    )
    .map_err(|e| anyhow::anyhow!("UI failed: {}", e))?;

    info!("Form Upload exiting");
    Ok(())
}
