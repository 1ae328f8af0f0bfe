use anyhow::Result;
use hpm_core::specimen::{SpecimenCache, builtin_specimens};

use crate::bootstrap::session_cache;

/// Lists the built-in roster and the session's uploads.
pub async fn run(session_id: &str) -> Result<()> {
    println!("Built-in specimens:");
    for specimen in builtin_specimens() {
        println!(
            "  {:<8} {:<20} {}",
            specimen.id,
            specimen.staged_title,
            specimen.source_url.as_deref().unwrap_or("-")
        );
    }

    let customs = session_cache(session_id).load().await?;
    if customs.is_empty() {
        println!("No custom specimens in session '{session_id}'.");
    } else {
        println!("Custom specimens in session '{session_id}':");
        for specimen in customs {
            println!("  {:<44} {}", specimen.id, specimen.name);
        }
    }
    Ok(())
}
