//! [`SpecimenCache`] implementations.
//!
//! `SessionDirSpecimenCache` keeps custom specimens as JSON in a per-session
//! temp directory; `MemorySpecimenCache` keeps them in process.

use async_trait::async_trait;
use hpm_core::error::{MatrixError, Result};
use hpm_core::specimen::{Specimen, SpecimenCache};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

const CACHE_FILE: &str = "custom_specimens.json";

/// File-backed cache scoped to one session directory.
///
/// Uses an in-memory copy so repeated loads don't hit the disk.
pub struct SessionDirSpecimenCache {
    session_dir: PathBuf,
    cache: RwLock<Option<Vec<Specimen>>>,
}

impl SessionDirSpecimenCache {
    pub fn new(session_dir: impl Into<PathBuf>) -> Self {
        Self {
            session_dir: session_dir.into(),
            cache: RwLock::new(None),
        }
    }

    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    fn cache_file(&self) -> PathBuf {
        self.session_dir.join(CACHE_FILE)
    }

    async fn read_from_disk(&self) -> Result<Vec<Specimen>> {
        let path = self.cache_file();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| MatrixError::cache(format!("Failed to read {path:?}: {e}")))?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| MatrixError::cache(format!("Failed to parse {path:?}: {e}")))
    }
}

#[async_trait]
impl SpecimenCache for SessionDirSpecimenCache {
    async fn load(&self) -> Result<Vec<Specimen>> {
        {
            let cache = self.cache.read().await;
            if let Some(specimens) = cache.as_ref() {
                return Ok(specimens.clone());
            }
        }

        let specimens = self.read_from_disk().await?;
        *self.cache.write().await = Some(specimens.clone());
        Ok(specimens)
    }

    async fn store(&self, specimens: &[Specimen]) -> Result<()> {
        let custom: Vec<Specimen> = specimens.iter().filter(|s| s.is_custom).cloned().collect();

        tokio::fs::create_dir_all(&self.session_dir)
            .await
            .map_err(|e| {
                MatrixError::cache(format!(
                    "Failed to create session dir {:?}: {e}",
                    self.session_dir
                ))
            })?;

        let json = serde_json::to_string_pretty(&custom)
            .map_err(|e| MatrixError::cache(format!("Failed to serialize specimens: {e}")))?;

        // Write to a sibling then rename so a crash never leaves half a file
        let path = self.cache_file();
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| MatrixError::cache(format!("Failed to write {tmp:?}: {e}")))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| MatrixError::cache(format!("Failed to replace {path:?}: {e}")))?;

        tracing::debug!(
            "[SpecimenCache] Stored {} custom specimen(s) in {:?}",
            custom.len(),
            path
        );
        *self.cache.write().await = Some(custom);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.cache.write().await = None;
        match tokio::fs::remove_dir_all(&self.session_dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MatrixError::cache(format!(
                "Failed to remove session dir {:?}: {e}",
                self.session_dir
            ))),
        }
    }
}

/// Process-local cache, for tests and one-shot runs.
#[derive(Default)]
pub struct MemorySpecimenCache {
    specimens: RwLock<Vec<Specimen>>,
}

impl MemorySpecimenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_specimens(specimens: Vec<Specimen>) -> Self {
        Self {
            specimens: RwLock::new(specimens),
        }
    }
}

#[async_trait]
impl SpecimenCache for MemorySpecimenCache {
    async fn load(&self) -> Result<Vec<Specimen>> {
        Ok(self.specimens.read().await.clone())
    }

    async fn store(&self, specimens: &[Specimen]) -> Result<()> {
        *self.specimens.write().await = specimens.iter().filter(|s| s.is_custom).cloned().collect();
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.specimens.write().await.clear();
        Ok(())
    }
}
