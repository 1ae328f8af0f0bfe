use anyhow::{Result, bail};
use hpm_application::RegenerateOutcome;
use std::path::{Path, PathBuf};

use super::{format_item, spawn_event_logger};
use crate::bootstrap::{Roster, bootstrap};

/// Ingests, then regenerates a single item.
///
/// The image is exported only when an export directory is given on the
/// command line or in the config.
pub async fn run(
    config_path: Option<&Path>,
    session_id: &str,
    id: &str,
    modifier: Option<&str>,
    export_dir: Option<PathBuf>,
) -> Result<()> {
    let boot = bootstrap(config_path, session_id, Roster::Builtin, true)?;
    spawn_event_logger(boot.events);
    let usecase = boot.usecase;

    usecase.ingest().await?;
    let item = match usecase.regenerate_item(id, modifier).await? {
        RegenerateOutcome::Regenerated(item) => item,
        RegenerateOutcome::AlreadyGenerating => bail!("'{id}' is already regenerating"),
        RegenerateOutcome::Discarded => bail!("'{id}' was removed during regeneration"),
    };
    println!("{}", format_item(&item));
    println!("{}", item.description);

    if let Some(dir) = export_dir.or(boot.config.matrix.export_dir) {
        let path = usecase.export_to_dir(&item.id, &dir).await?;
        println!("Exported {}", path.display());
    }
    Ok(())
}
