use anyhow::Result;
use hpm_core::specimen::SpecimenCache;

use crate::bootstrap::session_cache;

/// Drops every upload cached for the session.
pub async fn clear(session_id: &str) -> Result<()> {
    session_cache(session_id).clear().await?;
    println!("Session '{session_id}' cleared.");
    Ok(())
}
