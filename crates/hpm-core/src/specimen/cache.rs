//! Session-scoped specimen cache trait.

use super::model::Specimen;
use crate::error::Result;

/// Storage for user-added specimens that lives exactly as long as a session.
///
/// Only custom specimens are ever written here; the built-in roster is
/// rebuilt from presets at startup.
///
/// # Implementation Notes
///
/// - `load` is called once per ingest
/// - `store` replaces the whole list on every add/delete
/// - `clear` ends the session and drops everything
#[async_trait::async_trait]
pub trait SpecimenCache: Send + Sync {
    /// Loads the custom specimens cached for this session.
    ///
    /// An empty cache is not an error and yields an empty list.
    async fn load(&self) -> Result<Vec<Specimen>>;

    /// Replaces the cached custom specimens.
    async fn store(&self, specimens: &[Specimen]) -> Result<()>;

    /// Drops the cache for this session.
    async fn clear(&self) -> Result<()>;
}
