//! Specimen ingestion and persona regeneration use case.
//!
//! `MatrixUseCase` owns the session's [`MatrixState`] and drives the
//! collaborators (asset fetcher, metadata and image generators, session
//! cache). Every asynchronous completion is applied through the
//! identity-keyed reducer, so results that land after an item was deleted or
//! replaced are dropped instead of resurrecting stale data.

use crate::outcome::{BatchReport, ItemFailure, RegenerateOutcome};
use futures::future::join_all;
use hpm_core::config::AdjectivePolicy;
use hpm_core::encoding::{EncodedImage, resolve_upload_mime};
use hpm_core::error::{MatrixError, Result};
use hpm_core::event::{EventSink, MatrixEvent};
use hpm_core::export::{ExportedImage, export_image};
use hpm_core::generator::{
    AssetFetcher, ImageGenerator, ImageRequest, MetadataGenerator, MetadataRequest,
    SpecimenDescriptor,
};
use hpm_core::matrix::{ItemPatch, MatrixItem, MatrixState, status_caption};
use hpm_core::persona::{GeneratedPersona, UsedAdjectiveSet};
use hpm_core::specimen::{Specimen, SpecimenCache, builtin_specimens};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Work item for one image render in a batch.
struct RenderJob {
    item_id: String,
    persona: GeneratedPersona,
    asset: Option<EncodedImage>,
}

/// Use case for the persona matrix.
///
/// # Thread Safety
///
/// State sits behind an `Arc<RwLock<_>>`. Locks are only held for
/// synchronous reads and writes, never across a collaborator call.
pub struct MatrixUseCase {
    /// Session state (specimens, items, used adjectives, error banner)
    state: Arc<RwLock<MatrixState>>,
    /// Built-in specimens every ingest starts from
    roster: Vec<Specimen>,
    metadata_generator: Arc<dyn MetadataGenerator>,
    image_generator: Arc<dyn ImageGenerator>,
    asset_fetcher: Arc<dyn AssetFetcher>,
    specimen_cache: Arc<dyn SpecimenCache>,
    /// Held from taking a custom-specimen snapshot until it is stored
    cache_writer: Mutex<()>,
    events: EventSink,
    adjective_policy: AdjectivePolicy,
}

impl MatrixUseCase {
    /// Creates a use case over the built-in roster.
    pub fn new(
        metadata_generator: Arc<dyn MetadataGenerator>,
        image_generator: Arc<dyn ImageGenerator>,
        asset_fetcher: Arc<dyn AssetFetcher>,
        specimen_cache: Arc<dyn SpecimenCache>,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(MatrixState::new())),
            roster: builtin_specimens(),
            metadata_generator,
            image_generator,
            asset_fetcher,
            specimen_cache,
            cache_writer: Mutex::new(()),
            events: EventSink::disabled(),
            adjective_policy: AdjectivePolicy::default(),
        }
    }

    /// Replaces the built-in roster.
    pub fn with_roster(mut self, roster: Vec<Specimen>) -> Self {
        self.roster = roster;
        self
    }

    /// Publishes state changes to `events`.
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    pub fn with_adjective_policy(mut self, policy: AdjectivePolicy) -> Self {
        self.adjective_policy = policy;
        self
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// A copy of the whole state.
    pub async fn snapshot(&self) -> MatrixState {
        self.state.read().await.clone()
    }

    pub async fn items(&self) -> Vec<MatrixItem> {
        self.state.read().await.items.clone()
    }

    pub async fn item(&self, id: &str) -> Option<MatrixItem> {
        self.state.read().await.item(id).cloned()
    }

    /// The global error banner, if set.
    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn used_adjectives(&self) -> UsedAdjectiveSet {
        self.state.read().await.used_adjectives.clone()
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    // ------------------------------------------------------------------
    // Ingest
    // ------------------------------------------------------------------

    /// Builds the session view from the roster and the session cache.
    ///
    /// Source images are fetched one at a time in roster order. A failed
    /// fetch is replaced by the fallback placeholder and never reported.
    /// Nothing is committed unless the whole collection could be built.
    pub async fn ingest(&self) -> Result<Vec<MatrixItem>> {
        if self.state.read().await.any_generating() {
            return Err(MatrixError::Busy(
                "cannot re-ingest while a regeneration is running".to_string(),
            ));
        }

        let cached = self.specimen_cache.load().await.map_err(|e| {
            tracing::error!("[Ingest] Failed to load session cache: {}", e);
            e
        })?;

        let mut specimens = self.roster.clone();
        specimens.extend(
            cached
                .into_iter()
                .filter(|specimen| specimen.is_custom),
        );

        let total = specimens.len();
        tracing::info!("[Ingest] Ingesting {} specimen(s)", total);

        for (index, specimen) in specimens.iter_mut().enumerate() {
            if !specimen.has_asset() {
                specimen.asset = Some(self.fetch_asset(specimen).await);
            }
            self.events.emit(MatrixEvent::IngestProgress {
                completed: index + 1,
                total,
            });
        }

        let items: Vec<MatrixItem> = specimens.iter().map(MatrixItem::staged).collect();
        {
            let mut state = self.state.write().await;
            // A regeneration may have started while sources were fetched
            if state.any_generating() {
                tracing::warn!("[Ingest] Regeneration started during ingest, discarding result");
                return Err(MatrixError::Busy(
                    "a regeneration started while ingesting".to_string(),
                ));
            }
            state.specimens = specimens;
            state.items = items.clone();
            state.error = None;
            state.ingested = true;
        }

        let fallbacks = items.iter().filter(|item| item.is_fallback_asset).count();
        tracing::info!(
            "[Ingest] Staged {} item(s), {} on fallback asset",
            items.len(),
            fallbacks
        );
        self.events.emit(MatrixEvent::ItemsReset(items.clone()));
        Ok(items)
    }

    async fn fetch_asset(&self, specimen: &Specimen) -> EncodedImage {
        let Some(url) = specimen.source_url.as_deref() else {
            tracing::warn!(
                "[Ingest] Specimen '{}' has neither asset nor source URL",
                specimen.id
            );
            return EncodedImage::fallback();
        };

        match self.asset_fetcher.fetch(url).await {
            Ok(asset) => asset,
            Err(e) => {
                tracing::warn!(
                    "[Ingest] Could not fetch source for '{}', using placeholder: {}",
                    specimen.name,
                    e
                );
                EncodedImage::fallback()
            }
        }
    }

    // ------------------------------------------------------------------
    // Batch regenerate
    // ------------------------------------------------------------------

    /// Regenerates every item with one metadata call and concurrent image calls.
    ///
    /// # Errors
    ///
    /// - `Busy` if any item is already generating (nothing changes)
    /// - the metadata error if persona generation fails; the global error is
    ///   set and every item returns to idle with its content untouched
    ///
    /// Per-item image failures do not fail the batch; they are recorded on
    /// the item and listed in the report.
    pub async fn regenerate_all(&self) -> Result<BatchReport> {
        let (ids, targets, request) = {
            let mut state = self.state.write().await;
            if state.items.is_empty() {
                return Err(MatrixError::validation(
                    "nothing to regenerate; ingest specimens first",
                ));
            }
            if state.any_generating() {
                return Err(MatrixError::Busy(
                    "a regeneration is already running".to_string(),
                ));
            }

            state.error = None;
            state.apply_all(&ItemPatch::started(status_caption(0)));

            let ids: Vec<String> = state.items.iter().map(|item| item.id.clone()).collect();
            let targets: Vec<(String, String, Option<EncodedImage>)> = state
                .specimens
                .iter()
                .map(|s| (s.id.clone(), s.name.clone(), s.asset.clone()))
                .collect();
            let request = MetadataRequest {
                specimens: state.specimens.iter().map(SpecimenDescriptor::from).collect(),
                excluded_themes: state.used_adjectives.to_vec(),
                forced_theme: None,
            };
            (ids, targets, request)
        };

        tracing::info!("[Batch] Regenerating {} item(s)", ids.len());
        self.events.emit(MatrixEvent::GenerationStarted(ids.clone()));

        let personas = match self.metadata_generator.generate_personas(&request).await {
            Ok(personas) if !personas.is_empty() => personas,
            Ok(_) => {
                let err = MatrixError::invalid_response("metadata generator returned no personas");
                return Err(self.fail_batch(&ids, err).await);
            }
            Err(e) => return Err(self.fail_batch(&ids, e).await),
        };

        // First persona per specimen wins; unknown names are ignored
        let mut jobs: Vec<RenderJob> = Vec::new();
        for persona in personas {
            let target = targets.iter().find(|(_, name, _)| {
                name.eq_ignore_ascii_case(persona.character_name.trim())
            });
            match target {
                Some((id, _, asset)) if !jobs.iter().any(|job| &job.item_id == id) => {
                    jobs.push(RenderJob {
                        item_id: id.clone(),
                        persona,
                        asset: asset.clone(),
                    });
                }
                Some(_) => {}
                None => tracing::warn!(
                    "[Batch] Ignoring persona for unknown character '{}'",
                    persona.character_name
                ),
            }
        }

        let unmatched: Vec<String> = ids
            .iter()
            .filter(|id| !jobs.iter().any(|job| &job.item_id == *id))
            .cloned()
            .collect();
        if !unmatched.is_empty() {
            let mut state = self.state.write().await;
            for id in &unmatched {
                state.apply(id, &ItemPatch::idle());
            }
            for id in &unmatched {
                if let Some(item) = state.item(id) {
                    self.events.emit(MatrixEvent::ItemUpdated(item.clone()));
                }
            }
            tracing::warn!(
                "[Batch] No persona returned for {} item(s)",
                unmatched.len()
            );
        }

        for job in &jobs {
            self.events.emit(MatrixEvent::PersonaDrafted {
                item_id: job.item_id.clone(),
                persona: job.persona.clone(),
            });
        }

        let results = join_all(jobs.iter().map(|job| async move {
            let request = ImageRequest::for_persona(&job.persona, job.asset.as_ref());
            let rendered = self.image_generator.generate_image(&request).await;
            (job, self.complete_render(job, rendered, true).await)
        }))
        .await;

        let mut report = BatchReport {
            unmatched,
            ..Default::default()
        };
        for (job, result) in results {
            match result {
                Ok(Some(item)) => report.updated.push(item),
                Ok(None) => {}
                Err(e) => report.failed.push(ItemFailure {
                    item_id: job.item_id.clone(),
                    message: e.to_string(),
                }),
            }
        }

        tracing::info!(
            "[Batch] Finished: {} updated, {} failed, {} without persona",
            report.updated.len(),
            report.failed.len(),
            report.unmatched.len()
        );
        Ok(report)
    }

    /// Restores every batch item to idle and raises the global error.
    async fn fail_batch(&self, ids: &[String], err: MatrixError) -> MatrixError {
        tracing::error!("[Batch] Persona generation failed: {}", err);
        let message = err.to_string();
        let mut state = self.state.write().await;
        for id in ids {
            state.apply(id, &ItemPatch::idle());
        }
        state.error = Some(message.clone());
        for id in ids {
            if let Some(item) = state.item(id) {
                self.events.emit(MatrixEvent::ItemUpdated(item.clone()));
            }
        }
        self.events.emit(MatrixEvent::ErrorRaised(message));
        err
    }

    /// Merges one image completion into its item.
    ///
    /// Returns `Ok(None)` when the item no longer exists.
    async fn complete_render(
        &self,
        job: &RenderJob,
        rendered: Result<EncodedImage>,
        record_adjective: bool,
    ) -> Result<Option<MatrixItem>> {
        let mut state = self.state.write().await;
        match rendered {
            Ok(image) => {
                let patch = ItemPatch::hydrated(&job.persona, image.to_data_url());
                if !state.apply(&job.item_id, &patch) {
                    tracing::debug!(
                        "[Render] Dropping result for removed item '{}'",
                        job.item_id
                    );
                    return Ok(None);
                }
                if record_adjective {
                    if let Some(adjective) = job.persona.adjective() {
                        state.used_adjectives.insert(adjective);
                    }
                }
                let item = state.item(&job.item_id).cloned();
                if let Some(item) = &item {
                    self.events.emit(MatrixEvent::ItemUpdated(item.clone()));
                }
                Ok(item)
            }
            Err(e) => {
                tracing::warn!("[Render] Image for '{}' failed: {}", job.item_id, e);
                if state.apply(&job.item_id, &ItemPatch::failed(e.to_string())) {
                    self.events.emit(MatrixEvent::ItemFailed {
                        item_id: job.item_id.clone(),
                        message: e.to_string(),
                    });
                }
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Single item
    // ------------------------------------------------------------------

    /// Regenerates one item, optionally forcing a theme word.
    ///
    /// A blank or absent `modifier` falls back to the item's modifier input.
    /// Only the target item is ever touched.
    pub async fn regenerate_item(
        &self,
        id: &str,
        modifier: Option<&str>,
    ) -> Result<RegenerateOutcome> {
        let (request, asset, modified) = {
            let mut state = self.state.write().await;
            let item = state
                .item(id)
                .ok_or_else(|| MatrixError::not_found("item", id))?;
            if item.is_generating {
                tracing::debug!("[Regenerate] '{}' is already generating", id);
                return Ok(RegenerateOutcome::AlreadyGenerating);
            }

            let theme = modifier
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .or_else(|| item.modifier())
                .map(str::to_string);
            let specimen = state
                .specimen(id)
                .ok_or_else(|| MatrixError::not_found("specimen", id))?;
            let asset = specimen.asset.clone();
            let modified = theme.is_some();
            let request = MetadataRequest {
                specimens: vec![SpecimenDescriptor::from(specimen)],
                excluded_themes: state.used_adjectives.to_vec(),
                forced_theme: theme,
            };

            state.apply(id, &ItemPatch::started(status_caption(0)));
            (request, asset, modified)
        };

        tracing::info!(
            "[Regenerate] '{}' (theme: {})",
            id,
            request.forced_theme.as_deref().unwrap_or("none")
        );
        self.events
            .emit(MatrixEvent::GenerationStarted(vec![id.to_string()]));

        let persona = self
            .metadata_generator
            .generate_personas(&request)
            .await
            .and_then(|personas| select_persona(personas, &request));
        let persona = match persona {
            Ok(persona) => persona,
            Err(e) => return Err(self.fail_item(id, e).await),
        };

        {
            let mut state = self.state.write().await;
            if state.item(id).is_none() {
                return Ok(RegenerateOutcome::Discarded);
            }
            if self.adjective_policy.should_record(modified) {
                if let Some(adjective) = persona.adjective() {
                    state.used_adjectives.insert(adjective);
                }
            }
        }
        self.events.emit(MatrixEvent::PersonaDrafted {
            item_id: id.to_string(),
            persona: persona.clone(),
        });

        let job = RenderJob {
            item_id: id.to_string(),
            asset,
            persona,
        };
        let rendered = self
            .image_generator
            .generate_image(&ImageRequest::for_persona(&job.persona, job.asset.as_ref()))
            .await;

        match self.complete_render(&job, rendered, false).await? {
            Some(item) => Ok(RegenerateOutcome::Regenerated(item)),
            None => Ok(RegenerateOutcome::Discarded),
        }
    }

    async fn fail_item(&self, id: &str, err: MatrixError) -> MatrixError {
        tracing::warn!("[Regenerate] '{}' failed: {}", id, err);
        let mut state = self.state.write().await;
        if state.apply(id, &ItemPatch::failed(err.to_string())) {
            self.events.emit(MatrixEvent::ItemFailed {
                item_id: id.to_string(),
                message: err.to_string(),
            });
        }
        err
    }

    /// Stores the user's thematic modifier for an item.
    pub async fn set_modifier_input(&self, id: &str, input: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.apply(id, &ItemPatch::modifier(input)) {
            return Err(MatrixError::not_found("item", id));
        }
        if let Some(item) = state.item(id) {
            self.events.emit(MatrixEvent::ItemUpdated(item.clone()));
        }
        Ok(())
    }

    /// Rotates the status caption of every generating item to `tick`.
    pub async fn advance_status(&self, tick: usize) {
        let caption = status_caption(tick);
        let mut state = self.state.write().await;
        let generating: Vec<String> = state
            .items
            .iter()
            .filter(|item| item.is_generating)
            .map(|item| item.id.clone())
            .collect();
        for id in &generating {
            state.apply(id, &ItemPatch::caption(caption));
        }
    }

    // ------------------------------------------------------------------
    // Custom specimens
    // ------------------------------------------------------------------

    /// Adds a user-supplied specimen and stages an item for it.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Raw image bytes
    /// * `declared_mime` - Media type reported by the uploader, if any
    /// * `file_name` - Original file name, used to guess the media type
    /// * `name` - Display name; trimmed and must not be empty
    pub async fn add_custom_specimen(
        &self,
        bytes: &[u8],
        declared_mime: Option<&str>,
        file_name: Option<&str>,
        name: &str,
    ) -> Result<MatrixItem> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MatrixError::validation("specimen name must not be empty"));
        }
        if bytes.is_empty() {
            return Err(MatrixError::validation("uploaded image is empty"));
        }
        let mime_type = resolve_upload_mime(declared_mime, file_name, bytes)
            .ok_or_else(|| MatrixError::validation("upload is not a recognised image"))?;

        let specimen = Specimen::custom(name, EncodedImage::from_bytes(bytes, mime_type));
        let item = MatrixItem::staged(&specimen);
        let id = specimen.id.clone();

        let _writer = self.cache_writer.lock().await;
        let ingested = self.state.read().await.ingested;
        // Before the first ingest the session's earlier uploads only exist in the cache
        let mut customs = if ingested {
            Vec::new()
        } else {
            self.specimen_cache.load().await?
        };

        {
            let mut state = self.state.write().await;
            state.specimens.push(specimen);
            state.items.push(item.clone());
            if state.ingested {
                customs = state.custom_specimens();
            } else {
                customs.retain(|cached| cached.is_custom && state.specimen(&cached.id).is_none());
                customs.extend(state.custom_specimens());
            }
        }

        if let Err(e) = self.specimen_cache.store(&customs).await {
            tracing::error!("[Specimen] Failed to cache '{}': {}", name, e);
            self.state.write().await.remove(&id);
            return Err(e);
        }

        tracing::info!("[Specimen] Added custom specimen '{}' ({})", name, id);
        self.events.emit(MatrixEvent::SpecimenAdded(item.clone()));
        Ok(item)
    }

    /// Removes a custom specimen and its item.
    ///
    /// Built-in specimens cannot be removed. An in-flight regeneration of the
    /// removed item is discarded when it completes.
    pub async fn delete_custom_specimen(&self, id: &str) -> Result<()> {
        let _writer = self.cache_writer.lock().await;
        let (removed, customs) = {
            let mut state = self.state.write().await;
            let specimen = state
                .specimen(id)
                .ok_or_else(|| MatrixError::not_found("specimen", id))?;
            if !specimen.is_custom {
                return Err(MatrixError::NotDeletable(specimen.name.clone()));
            }
            let removed = state.remove(id);
            (removed, state.custom_specimens())
        };

        self.specimen_cache.store(&customs).await?;

        if let Some(specimen) = removed {
            tracing::info!(
                "[Specimen] Removed custom specimen '{}' ({})",
                specimen.name,
                id
            );
        }
        self.events.emit(MatrixEvent::SpecimenRemoved(id.to_string()));
        Ok(())
    }

    /// Drops the session cache.
    pub async fn end_session(&self) -> Result<()> {
        self.specimen_cache.clear().await
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Decodes an item's current image into a downloadable file.
    pub async fn export_item(&self, id: &str) -> Result<ExportedImage> {
        let (data_url, title) = {
            let state = self.state.read().await;
            let item = state
                .item(id)
                .ok_or_else(|| MatrixError::not_found("item", id))?;
            (item.image_url.clone(), item.title.clone())
        };
        self.export_data_url(&data_url, &title).await
    }

    /// Decodes a data URL into a file named after `title`.
    ///
    /// A malformed URL raises the global error; item state is unaffected.
    pub async fn export_data_url(&self, data_url: &str, title: &str) -> Result<ExportedImage> {
        match export_image(data_url, title) {
            Ok(exported) => Ok(exported),
            Err(e) => {
                let message = format!("Export of '{title}' failed: {e}");
                tracing::error!("[Export] {}", message);
                self.state.write().await.error = Some(message.clone());
                self.events.emit(MatrixEvent::ErrorRaised(message));
                Err(e)
            }
        }
    }

    /// Exports an item and writes it into `dir`. Returns the written path.
    pub async fn export_to_dir(&self, id: &str, dir: &Path) -> Result<PathBuf> {
        let exported = self.export_item(id).await?;
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&exported.file_name);
        tokio::fs::write(&path, &exported.bytes).await?;
        tracing::info!("[Export] Wrote {:?} ({} bytes)", path, exported.bytes.len());
        Ok(path)
    }
}

/// Picks the persona for a single-specimen request.
fn select_persona(
    personas: Vec<GeneratedPersona>,
    request: &MetadataRequest,
) -> Result<GeneratedPersona> {
    let name = request
        .specimens
        .first()
        .map(|s| s.name.as_str())
        .unwrap_or_default();
    let mut personas = personas.into_iter();
    let first = personas
        .next()
        .ok_or_else(|| MatrixError::invalid_response("metadata generator returned no persona"))?;
    if first.character_name.trim().eq_ignore_ascii_case(name) {
        return Ok(first);
    }
    // Prefer a name match, otherwise trust the single-specimen scope
    Ok(personas
        .find(|p| p.character_name.trim().eq_ignore_ascii_case(name))
        .unwrap_or(first))
}
