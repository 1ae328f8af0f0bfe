//! Hand-written collaborator fakes shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use hpm_application::MatrixUseCase;
use hpm_core::encoding::EncodedImage;
use hpm_core::error::{MatrixError, Result};
use hpm_core::event::{EventSink, MatrixEvent};
use hpm_core::generator::{
    AssetFetcher, ImageGenerator, ImageRequest, MetadataGenerator, MetadataRequest,
};
use hpm_core::persona::GeneratedPersona;
use hpm_core::specimen::{Specimen, SpecimenCache};
use hpm_infrastructure::MemorySpecimenCache;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;
use tokio::sync::mpsc::UnboundedReceiver;

/// 1x1 PNG.
pub const PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub fn png_bytes() -> Vec<u8> {
    EncodedImage::new(PNG_BASE64, "image/png").decode().unwrap()
}

/// Three built-ins; the second one's URL is the one tests make fail.
pub fn roster() -> Vec<Specimen> {
    vec![
        Specimen::builtin("Derrick", "https://img.test/derrick.jpg", "Danglets Derrick", "Street."),
        Specimen::builtin("Eleven", "https://img.test/eleven.jpg", "Ethereal Eleven", "Mist."),
        Specimen::builtin("Mike", "https://img.test/mike.jpg", "Mighty Mike", "Noir."),
    ]
}

/// Lets a test hold a fake mid-call.
#[derive(Default)]
pub struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }

    /// Waits until the fake has been entered.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

// ---------------------------------------------------------------------------
// Asset fetcher
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeFetcher {
    failing: HashSet<String>,
    gate: Mutex<Option<Arc<Gate>>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn failing(urls: &[&str]) -> Self {
        Self {
            failing: urls.iter().map(|u| u.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Holds the next fetch on `gate`; later fetches pass straight through.
    pub fn hold_next(&self, gate: Arc<Gate>) {
        *self.gate.lock().unwrap() = Some(gate);
    }
}

#[async_trait]
impl AssetFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<EncodedImage> {
        self.calls.lock().unwrap().push(url.to_string());
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        if self.failing.contains(url) {
            return Err(MatrixError::fetch(url, "connection reset"));
        }
        Ok(EncodedImage::new("anBlZw==", "image/jpeg"))
    }
}

// ---------------------------------------------------------------------------
// Metadata generator
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub enum MetadataMode {
    /// One persona per requested specimen
    Echo,
    /// Only personas for these names
    Only(Vec<String>),
    Empty,
    Fail(MatrixError),
}

pub struct FakeMetadata {
    mode: Mutex<MetadataMode>,
    gate: Mutex<Option<Arc<Gate>>>,
    round: AtomicUsize,
    pub requests: Mutex<Vec<MetadataRequest>>,
}

impl FakeMetadata {
    pub fn new(mode: MetadataMode) -> Self {
        Self {
            mode: Mutex::new(mode),
            gate: Mutex::new(None),
            round: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn set_mode(&self, mode: MetadataMode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn set_gate(&self, gate: Option<Arc<Gate>>) {
        *self.gate.lock().unwrap() = gate;
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> MetadataRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

/// Title produced for `name` in round `round`, e.g. `D1x Derrick`.
pub fn echo_title(name: &str, round: usize) -> String {
    format!("{}{}x {}", &name[..1], round, name)
}

#[async_trait]
impl MetadataGenerator for FakeMetadata {
    async fn generate_personas(&self, request: &MetadataRequest) -> Result<Vec<GeneratedPersona>> {
        self.requests.lock().unwrap().push(request.clone());
        let round = self.round.fetch_add(1, Ordering::SeqCst) + 1;

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }

        let mode = self.mode.lock().unwrap().clone();
        let persona = |name: &str| GeneratedPersona {
            character_name: name.to_string(),
            title: echo_title(name, round),
            description: format!("{name} in round {round}"),
        };
        match mode {
            MetadataMode::Echo => Ok(request.specimens.iter().map(|s| persona(&s.name)).collect()),
            MetadataMode::Only(names) => Ok(names.iter().map(|n| persona(n)).collect()),
            MetadataMode::Empty => Ok(Vec::new()),
            MetadataMode::Fail(e) => Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Image generator
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeImages {
    failing: Mutex<HashSet<String>>,
    gate: Mutex<Option<Arc<Gate>>>,
    pub requests: Mutex<Vec<ImageRequest>>,
}

impl FakeImages {
    pub fn fail_for(&self, name: &str) {
        self.failing.lock().unwrap().insert(name.to_string());
    }

    pub fn set_gate(&self, gate: Option<Arc<Gate>>) {
        *self.gate.lock().unwrap() = gate;
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageGenerator for FakeImages {
    async fn generate_image(&self, request: &ImageRequest) -> Result<EncodedImage> {
        self.requests.lock().unwrap().push(request.clone());

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }

        if self.failing.lock().unwrap().contains(&request.character_name) {
            return Err(MatrixError::generation("No image data returned from Gemini"));
        }
        Ok(EncodedImage::new(PNG_BASE64, "image/png"))
    }
}

// ---------------------------------------------------------------------------
// Session cache
// ---------------------------------------------------------------------------

/// Cache whose reads always fail.
pub struct BrokenCache;

#[async_trait]
impl SpecimenCache for BrokenCache {
    async fn load(&self) -> Result<Vec<Specimen>> {
        Err(MatrixError::cache("disk on fire"))
    }

    async fn store(&self, _specimens: &[Specimen]) -> Result<()> {
        Err(MatrixError::cache("disk on fire"))
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }
}

/// Memory cache whose next `store` can be held open.
#[derive(Default)]
pub struct GatedCache {
    inner: MemorySpecimenCache,
    gate: Mutex<Option<Arc<Gate>>>,
}

impl GatedCache {
    pub fn with_specimens(specimens: Vec<Specimen>) -> Self {
        Self {
            inner: MemorySpecimenCache::with_specimens(specimens),
            gate: Mutex::new(None),
        }
    }

    pub fn hold_next_store(&self, gate: Arc<Gate>) {
        *self.gate.lock().unwrap() = Some(gate);
    }
}

#[async_trait]
impl SpecimenCache for GatedCache {
    async fn load(&self) -> Result<Vec<Specimen>> {
        self.inner.load().await
    }

    async fn store(&self, specimens: &[Specimen]) -> Result<()> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        self.inner.store(specimens).await
    }

    async fn clear(&self) -> Result<()> {
        self.inner.clear().await
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub usecase: Arc<MatrixUseCase>,
    pub fetcher: Arc<FakeFetcher>,
    pub metadata: Arc<FakeMetadata>,
    pub images: Arc<FakeImages>,
    pub cache: Arc<dyn SpecimenCache>,
    pub events: UnboundedReceiver<MatrixEvent>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(FakeFetcher::default(), Arc::new(MemorySpecimenCache::new()), |u| u)
    }

    pub fn with(
        fetcher: FakeFetcher,
        cache: Arc<dyn SpecimenCache>,
        configure: impl FnOnce(MatrixUseCase) -> MatrixUseCase,
    ) -> Self {
        let fetcher = Arc::new(fetcher);
        let metadata = Arc::new(FakeMetadata::new(MetadataMode::Echo));
        let images = Arc::new(FakeImages::default());
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        let usecase = MatrixUseCase::new(
            metadata.clone(),
            images.clone(),
            fetcher.clone(),
            cache.clone(),
        )
        .with_roster(roster())
        .with_events(EventSink::new(tx));

        Self {
            usecase: Arc::new(configure(usecase)),
            fetcher,
            metadata,
            images,
            cache,
            events: rx,
        }
    }

    /// Drains every event published so far.
    pub fn drain_events(&mut self) -> Vec<MatrixEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}
