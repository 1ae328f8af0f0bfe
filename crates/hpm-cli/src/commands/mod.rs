pub mod regenerate;
pub mod roster;
pub mod run;
pub mod session;
pub mod specimen;

use hpm_core::event::MatrixEvent;
use hpm_core::matrix::MatrixItem;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedReceiver;

/// Directory exports go to when neither flag nor config names one.
const DEFAULT_EXPORT_DIR: &str = "hpm-exports";

/// One-line summary of an item.
pub fn format_item(item: &MatrixItem) -> String {
    let mut line = format!("{:<10} {:<44} {}", item.phase(), item.id, item.title);
    if item.is_fallback_asset {
        line.push_str("  [fallback mode]");
    }
    if let Some(error) = &item.last_error {
        line.push_str(&format!("  (error: {error})"));
    }
    line
}

/// Export directory: explicit flag, then config, then `./hpm-exports`.
pub fn resolve_export_dir(flag: Option<PathBuf>, configured: Option<&Path>) -> PathBuf {
    flag.or_else(|| configured.map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR))
}

/// Logs matrix events until the use case is dropped.
pub fn spawn_event_logger(mut events: UnboundedReceiver<MatrixEvent>) {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                MatrixEvent::IngestProgress { completed, total } => {
                    tracing::info!("[Ingest] {}/{} specimen(s) processed", completed, total);
                }
                MatrixEvent::PersonaDrafted { item_id, persona } => {
                    tracing::info!("[Draft] {} -> {}", item_id, persona.title);
                }
                MatrixEvent::ItemFailed { item_id, message } => {
                    tracing::warn!("[Item] {} failed: {}", item_id, message);
                }
                MatrixEvent::ErrorRaised(message) => {
                    tracing::error!("[Matrix] {}", message);
                }
                other => tracing::debug!("[Event] {:?}", other),
            }
        }
    });
}
