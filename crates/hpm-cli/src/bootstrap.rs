//! Composition root: wires configuration, collaborators and the use case.

use anyhow::{Context, Result};
use async_trait::async_trait;
use hpm_application::MatrixUseCase;
use hpm_core::config::MatrixConfig;
use hpm_core::encoding::EncodedImage;
use hpm_core::error::MatrixError;
use hpm_core::event::{EventSink, MatrixEvent};
use hpm_core::generator::{
    ImageGenerator, ImageRequest, MetadataGenerator, MetadataRequest,
};
use hpm_core::persona::GeneratedPersona;
use hpm_core::specimen::{Specimen, SpecimenCache};
use hpm_infrastructure::{ConfigService, HttpAssetFetcher, MatrixPaths, SessionDirSpecimenCache};
use hpm_interaction::{GeminiClient, GeminiImageGenerator, GeminiMetadataGenerator, PromptTemplates};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

/// Which specimens an ingest should start from.
pub enum Roster {
    /// The built-in roster plus session uploads
    Builtin,
    /// Session uploads only; nothing is fetched
    SessionOnly,
}

pub struct MatrixBootstrap {
    pub usecase: Arc<MatrixUseCase>,
    pub config: MatrixConfig,
    pub events: UnboundedReceiver<MatrixEvent>,
}

/// Loads configuration from `config_path` (or the platform config dir).
pub fn load_config(config_path: Option<&Path>) -> Result<(ConfigService, MatrixConfig)> {
    let service = match config_path {
        Some(path) => ConfigService::with_config_file(path),
        None => ConfigService::new(None)?,
    };
    let config = service
        .load_config()
        .with_context(|| format!("Failed to load {:?}", service.config_path()))?;
    Ok((service, config))
}

/// Session cache for `session_id`.
pub fn session_cache(session_id: &str) -> Arc<SessionDirSpecimenCache> {
    Arc::new(SessionDirSpecimenCache::new(MatrixPaths::session_dir(
        session_id,
    )))
}

/// Builds the use case.
///
/// With `with_gemini` unset the generators refuse to run, so commands that
/// only manage specimens work without an API key.
pub fn bootstrap(
    config_path: Option<&Path>,
    session_id: &str,
    roster: Roster,
    with_gemini: bool,
) -> Result<MatrixBootstrap> {
    let (config_service, config) = load_config(config_path)?;

    let (metadata_generator, image_generator) = if with_gemini {
        gemini_generators(&config_service, &config)?
    } else {
        let metadata: Arc<dyn MetadataGenerator> = Arc::new(OfflineGenerator);
        let image: Arc<dyn ImageGenerator> = Arc::new(OfflineGenerator);
        (metadata, image)
    };

    let asset_fetcher = Arc::new(HttpAssetFetcher::new(Duration::from_secs(
        config.matrix.fetch_timeout_secs,
    ))?);
    let cache: Arc<dyn SpecimenCache> = session_cache(session_id);
    let (tx, rx) = unbounded_channel();

    let mut usecase = MatrixUseCase::new(metadata_generator, image_generator, asset_fetcher, cache)
        .with_events(EventSink::new(tx))
        .with_adjective_policy(config.matrix.adjective_policy);
    if let Roster::SessionOnly = roster {
        usecase = usecase.with_roster(Vec::<Specimen>::new());
    }

    tracing::info!("[Bootstrap] Session '{}' ready", session_id);
    Ok(MatrixBootstrap {
        usecase: Arc::new(usecase),
        config,
        events: rx,
    })
}

fn gemini_generators(
    config_service: &ConfigService,
    config: &MatrixConfig,
) -> Result<(Arc<dyn MetadataGenerator>, Arc<dyn ImageGenerator>)> {
    let client = GeminiClient::try_from_config(config_service, &config.gemini)?;
    let templates = Arc::new(PromptTemplates::new()?);
    tracing::info!(
        "[Bootstrap] Gemini models: text={}, image={}",
        config.gemini.text_model,
        config.gemini.image_model
    );

    let metadata: Arc<dyn MetadataGenerator> = Arc::new(GeminiMetadataGenerator::new(
        client.clone(),
        config.gemini.text_model.clone(),
        templates.clone(),
    ));
    let image: Arc<dyn ImageGenerator> = Arc::new(GeminiImageGenerator::new(
        client,
        config.gemini.image_model.clone(),
        config.gemini.aspect_ratio.clone(),
        templates,
    ));
    Ok((metadata, image))
}

/// Stand-in generator for commands that never generate.
struct OfflineGenerator;

fn offline_error() -> MatrixError {
    MatrixError::config("this command does not configure a Gemini client")
}

#[async_trait]
impl MetadataGenerator for OfflineGenerator {
    async fn generate_personas(&self, _request: &MetadataRequest) -> hpm_core::Result<Vec<GeneratedPersona>> {
        Err(offline_error())
    }
}

#[async_trait]
impl ImageGenerator for OfflineGenerator {
    async fn generate_image(&self, _request: &ImageRequest) -> hpm_core::Result<EncodedImage> {
        Err(offline_error())
    }
}
