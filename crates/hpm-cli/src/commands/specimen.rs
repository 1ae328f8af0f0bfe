use anyhow::{Context, Result};
use hpm_core::error::MatrixError;
use hpm_core::specimen::builtin_specimens;
use std::path::Path;

use super::format_item;
use crate::bootstrap::{Roster, bootstrap};

/// Adds an image file as a custom specimen of the session.
pub async fn add(
    config_path: Option<&Path>,
    session_id: &str,
    image_path: &Path,
    name: &str,
) -> Result<()> {
    let bytes = tokio::fs::read(image_path)
        .await
        .with_context(|| format!("Failed to read {}", image_path.display()))?;
    let file_name = image_path.file_name().and_then(|n| n.to_str());

    let boot = bootstrap(config_path, session_id, Roster::SessionOnly, false)?;
    // Loads the session's earlier uploads; nothing is fetched for them
    boot.usecase.ingest().await?;
    let item = boot
        .usecase
        .add_custom_specimen(&bytes, None, file_name, name)
        .await?;

    println!("{}", format_item(&item));
    Ok(())
}

/// Removes a custom specimen from the session.
pub async fn remove(config_path: Option<&Path>, session_id: &str, id: &str) -> Result<()> {
    // Built-ins aren't loaded for a session-only ingest, so check them here
    if let Some(builtin) = builtin_specimens().into_iter().find(|s| s.id == id) {
        return Err(MatrixError::NotDeletable(builtin.name).into());
    }

    let boot = bootstrap(config_path, session_id, Roster::SessionOnly, false)?;
    boot.usecase.ingest().await?;
    boot.usecase.delete_custom_specimen(id).await?;
    println!("Removed {id}.");
    Ok(())
}
