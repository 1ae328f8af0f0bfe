use anyhow::Result;
use std::path::{Path, PathBuf};

use super::{format_item, resolve_export_dir, spawn_event_logger};
use crate::bootstrap::{Roster, bootstrap};

/// Ingests the roster, regenerates everything and exports what hydrated.
pub async fn run(
    config_path: Option<&Path>,
    session_id: &str,
    export_dir: Option<PathBuf>,
    no_batch: bool,
) -> Result<()> {
    let boot = bootstrap(config_path, session_id, Roster::Builtin, !no_batch)?;
    spawn_event_logger(boot.events);
    let usecase = boot.usecase;

    let items = usecase.ingest().await?;
    if no_batch {
        for item in &items {
            println!("{}", format_item(item));
        }
        return Ok(());
    }

    let report = usecase.regenerate_all().await?;
    for item in usecase.items().await {
        println!("{}", format_item(&item));
    }
    println!(
        "{} updated, {} failed, {} without persona",
        report.updated.len(),
        report.failed.len(),
        report.unmatched.len()
    );

    let dir = resolve_export_dir(export_dir, boot.config.matrix.export_dir.as_deref());
    for item in &report.updated {
        let path = usecase.export_to_dir(&item.id, &dir).await?;
        println!("Exported {}", path.display());
    }
    Ok(())
}
