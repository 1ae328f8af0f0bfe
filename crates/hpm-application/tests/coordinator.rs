mod support;

use hpm_application::RegenerateOutcome;
use hpm_core::config::AdjectivePolicy;
use hpm_core::encoding::EncodedImage;
use hpm_core::error::MatrixError;
use hpm_core::event::MatrixEvent;
use hpm_core::matrix::{ItemPhase, MatrixItem, STATUS_CAPTIONS};
use hpm_core::specimen::{Specimen, SpecimenCache};
use hpm_infrastructure::MemorySpecimenCache;
use std::sync::Arc;
use support::{BrokenCache, FakeFetcher, Gate, Harness, MetadataMode, PNG_BASE64, echo_title};

fn content(items: &[MatrixItem]) -> Vec<(String, String, String)> {
    items
        .iter()
        .map(|i| (i.title.clone(), i.description.clone(), i.image_url.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// Ingest
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_ingest_with_failing_fetch_stages_all_specimens() {
    let mut h = Harness::with(
        FakeFetcher::failing(&["https://img.test/eleven.jpg"]),
        Arc::new(MemorySpecimenCache::new()),
        |u| u,
    );

    let items = h.usecase.ingest().await.expect("Should ingest");

    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| i.is_staged && !i.is_generating));
    assert_eq!(items[1].id, "Eleven");
    assert!(items[1].is_fallback_asset);
    assert_eq!(items[1].image_url, EncodedImage::fallback().to_data_url());
    assert!(!items[0].is_fallback_asset);
    assert_eq!(items[0].image_url, "data:image/jpeg;base64,anBlZw==");
    assert_eq!(h.usecase.error().await, None);

    let snapshot = h.usecase.snapshot().await;
    assert!(snapshot.ingested);
    assert_eq!(
        snapshot.specimen("Eleven").unwrap().asset,
        Some(EncodedImage::fallback())
    );

    // Fetched in order, one per specimen
    assert_eq!(
        *h.fetcher.calls.lock().unwrap(),
        vec![
            "https://img.test/derrick.jpg",
            "https://img.test/eleven.jpg",
            "https://img.test/mike.jpg"
        ]
    );

    let progress: Vec<(usize, usize)> = h
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            MatrixEvent::IngestProgress { completed, total } => Some((completed, total)),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![(1, 3), (2, 3), (3, 3)]);
}

#[tokio::test]
async fn test_ingest_appends_cached_custom_specimens_without_fetching() {
    let custom = Specimen::custom("Hopper", EncodedImage::new(PNG_BASE64, "image/png"));
    let cache = Arc::new(MemorySpecimenCache::with_specimens(vec![custom.clone()]));
    let h = Harness::with(FakeFetcher::default(), cache, |u| u);

    let items = h.usecase.ingest().await.unwrap();

    assert_eq!(items.len(), 4);
    assert_eq!(items[3].id, custom.id);
    assert!(items[3].is_custom);
    assert_eq!(items[3].title, "Hopper");
    assert_eq!(h.fetcher.calls.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_ingest_cache_failure_applies_nothing() {
    let h = Harness::with(FakeFetcher::default(), Arc::new(BrokenCache), |u| u);

    let err = h.usecase.ingest().await.unwrap_err();

    assert!(matches!(err, MatrixError::Cache(_)));
    let snapshot = h.usecase.snapshot().await;
    assert!(!snapshot.ingested);
    assert!(snapshot.items.is_empty());
    assert!(h.fetcher.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_reingest_resets_items_to_staged() {
    let h = Harness::new();
    h.usecase.ingest().await.unwrap();
    h.usecase.regenerate_all().await.unwrap();
    assert_eq!(h.usecase.snapshot().await.hydrated_count(), 3);

    let items = h.usecase.ingest().await.unwrap();
    assert!(items.iter().all(|i| i.phase() == ItemPhase::Staged));
    // Adjectives survive for the rest of the session
    assert_eq!(h.usecase.used_adjectives().await.len(), 3);
}

#[tokio::test]
async fn test_reingest_yields_to_batch_started_while_fetching() {
    let h = Harness::new();
    h.usecase.ingest().await.unwrap();

    let fetch_gate = Gate::new();
    h.fetcher.hold_next(fetch_gate.clone());
    let usecase = h.usecase.clone();
    let reingest = tokio::spawn(async move { usecase.ingest().await });
    fetch_gate.wait_entered().await;

    let metadata_gate = Gate::new();
    h.metadata.set_gate(Some(metadata_gate.clone()));
    let usecase = h.usecase.clone();
    let batch = tokio::spawn(async move { usecase.regenerate_all().await });
    metadata_gate.wait_entered().await;

    fetch_gate.release();
    let err = reingest.await.unwrap().unwrap_err();
    assert!(matches!(err, MatrixError::Busy(_)));
    assert!(h.usecase.items().await.iter().all(|i| i.is_generating));

    metadata_gate.release();
    let report = batch.await.unwrap().unwrap();
    assert_eq!(report.updated.len(), 3);
    assert_eq!(h.usecase.snapshot().await.hydrated_count(), 3);
}

// ---------------------------------------------------------------------------
// Batch regenerate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_batch_marks_every_item_generating_before_results() {
    let h = Harness::new();
    h.usecase.ingest().await.unwrap();

    let gate = Gate::new();
    h.metadata.set_gate(Some(gate.clone()));

    let usecase = h.usecase.clone();
    let task = tokio::spawn(async move { usecase.regenerate_all().await });

    gate.wait_entered().await;
    let items = h.usecase.items().await;
    assert!(items.iter().all(|i| i.is_generating));
    assert!(items
        .iter()
        .all(|i| i.status_caption.as_deref() == Some(STATUS_CAPTIONS[0])));

    // A second batch is refused while the first is running
    let busy = h.usecase.regenerate_all().await.unwrap_err();
    assert!(matches!(busy, MatrixError::Busy(_)));

    gate.release();
    let report = task.await.unwrap().unwrap();
    assert!(report.is_complete());
    assert_eq!(report.updated.len(), 3);
    assert!(h.usecase.items().await.iter().all(|i| !i.is_generating));
}

#[tokio::test]
async fn test_batch_metadata_failure_restores_items_unchanged() {
    let h = Harness::new();
    h.usecase.ingest().await.unwrap();
    let before = h.usecase.items().await;

    h.metadata
        .set_mode(MetadataMode::Fail(MatrixError::generation("HTTP 500: boom")));
    let err = h.usecase.regenerate_all().await.unwrap_err();

    assert!(err.is_generation());
    let after = h.usecase.items().await;
    assert!(after.iter().all(|i| !i.is_generating));
    assert_eq!(content(&before), content(&after));
    assert_eq!(h.images.call_count(), 0);
    assert!(h.usecase.error().await.unwrap().contains("boom"));
}

#[tokio::test]
async fn test_batch_empty_metadata_is_a_global_error() {
    let h = Harness::new();
    h.usecase.ingest().await.unwrap();
    let before = h.usecase.items().await;

    h.metadata.set_mode(MetadataMode::Empty);
    let err = h.usecase.regenerate_all().await.unwrap_err();

    assert!(matches!(err, MatrixError::InvalidResponse(_)));
    assert_eq!(content(&before), content(&h.usecase.items().await));
    assert!(h.usecase.error().await.is_some());
}

#[tokio::test]
async fn test_batch_success_hydrates_and_records_adjectives() {
    let mut h = Harness::new();
    h.usecase.ingest().await.unwrap();
    h.drain_events();

    let report = h.usecase.regenerate_all().await.unwrap();

    assert_eq!(report.updated.len(), 3);
    let items = h.usecase.items().await;
    for item in &items {
        assert_eq!(item.phase(), ItemPhase::Hydrated);
        assert_eq!(item.title, echo_title(&item.character_name, 1));
        assert_eq!(item.image_url, format!("data:image/png;base64,{PNG_BASE64}"));
        assert_eq!(item.status_caption, None);
    }
    assert_eq!(
        h.usecase.used_adjectives().await.as_slice(),
        &["D1x".to_string(), "E1x".to_string(), "M1x".to_string()]
    );

    // The first request carries everything, the next one excludes the used adjectives
    assert!(h.metadata.last_request().excluded_themes.is_empty());
    h.usecase.regenerate_all().await.unwrap();
    assert_eq!(h.metadata.last_request().excluded_themes.len(), 3);

    // Every item's draft is announced before its update
    let events = h.drain_events();
    for id in ["Derrick", "Eleven", "Mike"] {
        let drafted = events
            .iter()
            .position(|e| matches!(e, MatrixEvent::PersonaDrafted { item_id, .. } if item_id == id))
            .unwrap();
        let updated = events
            .iter()
            .position(|e| matches!(e, MatrixEvent::ItemUpdated(item) if item.id == id))
            .unwrap();
        assert!(drafted < updated, "{id}");
    }
}

#[tokio::test]
async fn test_batch_matches_personas_by_name_and_isolates_failures() {
    let h = Harness::new();
    h.usecase.ingest().await.unwrap();
    let before = h.usecase.items().await;

    // No persona for Mike; Eleven's image fails
    h.metadata.set_mode(MetadataMode::Only(vec![
        "eleven".to_string(),
        "DERRICK".to_string(),
        "Nobody".to_string(),
    ]));
    h.images.fail_for("eleven");

    let report = h.usecase.regenerate_all().await.unwrap();

    assert_eq!(report.unmatched, vec!["Mike".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].item_id, "Eleven");
    assert_eq!(report.updated.len(), 1);
    assert_eq!(report.updated[0].id, "Derrick");

    let items = h.usecase.items().await;
    assert_eq!(items[0].phase(), ItemPhase::Hydrated);

    let eleven = &items[1];
    assert!(!eleven.is_generating);
    assert!(eleven.is_staged);
    assert!(eleven.last_error.as_deref().unwrap().contains("No image data"));
    assert_eq!(content(&before[1..2]), content(&items[1..2]));

    let mike = &items[2];
    assert!(!mike.is_generating);
    assert_eq!(mike.last_error, None);
    assert_eq!(content(&before[2..3]), content(&items[2..3]));

    // Per-item failures never raise the global banner
    assert_eq!(h.usecase.error().await, None);
    // Only the successful render recorded its adjective
    assert_eq!(h.usecase.used_adjectives().await.as_slice(), &["D1x".to_string()]);
}

#[tokio::test]
async fn test_batch_forwards_likeness_but_not_placeholder() {
    let h = Harness::with(
        FakeFetcher::failing(&["https://img.test/mike.jpg"]),
        Arc::new(MemorySpecimenCache::new()),
        |u| u,
    );
    h.usecase.ingest().await.unwrap();
    h.usecase.regenerate_all().await.unwrap();

    let requests = h.images.requests.lock().unwrap().clone();
    let source_of = |name: &str| {
        requests
            .iter()
            .find(|r| r.character_name == name)
            .unwrap()
            .source
            .clone()
    };
    assert_eq!(source_of("Derrick"), Some(EncodedImage::new("anBlZw==", "image/jpeg")));
    assert_eq!(source_of("Mike"), None);
}

#[tokio::test]
async fn test_batch_without_items_is_rejected() {
    let h = Harness::new();
    let err = h.usecase.regenerate_all().await.unwrap_err();
    assert!(matches!(err, MatrixError::Validation(_)));
    assert_eq!(h.metadata.call_count(), 0);
}

// ---------------------------------------------------------------------------
// Single item
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_single_regenerate_touches_only_target() {
    let h = Harness::new();
    h.usecase.ingest().await.unwrap();
    let before = h.usecase.items().await;

    let outcome = h.usecase.regenerate_item("Eleven", None).await.unwrap();

    let regenerated = outcome.item().unwrap();
    assert_eq!(regenerated.title, echo_title("Eleven", 1));
    assert!(!regenerated.is_staged);

    let after = h.usecase.items().await;
    assert_eq!(before[0], after[0]);
    assert_eq!(before[2], after[2]);

    let request = h.metadata.last_request();
    assert_eq!(request.specimens.len(), 1);
    assert_eq!(request.specimens[0].name, "Eleven");
    assert_eq!(request.specimens[0].letter, "E");
}

#[tokio::test]
async fn test_single_regenerate_while_generating_is_noop() {
    let h = Harness::new();
    h.usecase.ingest().await.unwrap();

    let gate = Gate::new();
    h.images.set_gate(Some(gate.clone()));

    let usecase = h.usecase.clone();
    let task = tokio::spawn(async move { usecase.regenerate_item("Mike", None).await });
    gate.wait_entered().await;

    let second = h.usecase.regenerate_item("Mike", Some("Noir")).await.unwrap();
    assert_eq!(second, RegenerateOutcome::AlreadyGenerating);
    assert_eq!(h.metadata.call_count(), 1);
    assert_eq!(h.images.call_count(), 1);

    // Other items are still available
    h.images.set_gate(None);
    let other = h.usecase.regenerate_item("Derrick", None).await.unwrap();
    assert!(matches!(other, RegenerateOutcome::Regenerated(_)));

    gate.release();
    let first = task.await.unwrap().unwrap();
    assert!(matches!(first, RegenerateOutcome::Regenerated(_)));
}

#[tokio::test]
async fn test_single_regenerate_unknown_item() {
    let h = Harness::new();
    h.usecase.ingest().await.unwrap();
    let err = h.usecase.regenerate_item("Vecna", None).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_modifier_input_is_used_and_not_recorded_by_default() {
    let h = Harness::new();
    h.usecase.ingest().await.unwrap();
    h.usecase.set_modifier_input("Mike", "  Noir ").await.unwrap();

    h.usecase.regenerate_item("Mike", None).await.unwrap();

    assert_eq!(h.metadata.last_request().forced_theme.as_deref(), Some("Noir"));
    assert!(h.usecase.used_adjectives().await.is_empty());

    // An explicit argument wins over the stored input
    h.usecase.regenerate_item("Mike", Some("Disco")).await.unwrap();
    assert_eq!(h.metadata.last_request().forced_theme.as_deref(), Some("Disco"));

    // Without any modifier the adjective is recorded
    h.usecase.set_modifier_input("Mike", "").await.unwrap();
    h.usecase.regenerate_item("Mike", None).await.unwrap();
    assert_eq!(h.metadata.last_request().forced_theme, None);
    assert_eq!(h.usecase.used_adjectives().await.as_slice(), &["M3x".to_string()]);
}

#[tokio::test]
async fn test_always_policy_records_modified_adjectives() {
    let h = Harness::with(
        FakeFetcher::default(),
        Arc::new(MemorySpecimenCache::new()),
        |u| u.with_adjective_policy(AdjectivePolicy::Always),
    );
    h.usecase.ingest().await.unwrap();

    h.usecase.regenerate_item("Mike", Some("Noir")).await.unwrap();
    assert_eq!(h.usecase.used_adjectives().await.as_slice(), &["M1x".to_string()]);
}

#[tokio::test]
async fn test_single_regenerate_failure_sets_item_error() {
    let h = Harness::new();
    h.usecase.ingest().await.unwrap();
    let before = h.usecase.items().await;

    h.images.fail_for("Derrick");
    let err = h.usecase.regenerate_item("Derrick", None).await.unwrap_err();
    assert!(err.is_generation());

    let derrick = h.usecase.item("Derrick").await.unwrap();
    assert!(!derrick.is_generating);
    assert!(derrick.last_error.is_some());
    assert_eq!(content(&before[..1]), content(&[derrick]));

    h.metadata
        .set_mode(MetadataMode::Fail(MatrixError::invalid_response("not json")));
    let err = h.usecase.regenerate_item("Mike", None).await.unwrap_err();
    assert!(matches!(err, MatrixError::InvalidResponse(_)));
    assert!(h.usecase.item("Mike").await.unwrap().last_error.is_some());
    assert_eq!(h.usecase.error().await, None);

    // A later success clears the item error
    h.metadata.set_mode(MetadataMode::Echo);
    h.usecase.regenerate_item("Mike", None).await.unwrap();
    assert_eq!(h.usecase.item("Mike").await.unwrap().last_error, None);
}

#[tokio::test]
async fn test_advance_status_only_touches_generating_items() {
    let h = Harness::new();
    h.usecase.ingest().await.unwrap();

    let gate = Gate::new();
    h.metadata.set_gate(Some(gate.clone()));
    let usecase = h.usecase.clone();
    let task = tokio::spawn(async move { usecase.regenerate_item("Eleven", None).await });
    gate.wait_entered().await;

    h.usecase.advance_status(2).await;
    let items = h.usecase.items().await;
    assert_eq!(items[1].status_caption.as_deref(), Some(STATUS_CAPTIONS[2]));
    assert_eq!(items[0].status_caption, None);
    assert_eq!(items[2].status_caption, None);

    gate.release();
    task.await.unwrap().unwrap();
    assert_eq!(h.usecase.item("Eleven").await.unwrap().status_caption, None);
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_export_hydrated_item() {
    let h = Harness::new();
    h.usecase.ingest().await.unwrap();
    h.usecase.regenerate_item("Derrick", None).await.unwrap();

    let exported = h.usecase.export_item("Derrick").await.unwrap();
    assert_eq!(exported.mime_type, "image/png");
    assert_eq!(exported.file_name, "d1x_derrick.png");
    assert_eq!(exported.bytes, support::png_bytes());
}

#[tokio::test]
async fn test_export_malformed_encoding_reports_error() {
    let h = Harness::new();
    h.usecase.ingest().await.unwrap();
    let before = h.usecase.items().await;

    let err = h
        .usecase
        .export_data_url("data:image/png;base64,%%%", "Broken")
        .await
        .unwrap_err();
    assert!(matches!(err, MatrixError::Decode(_)));
    assert!(h.usecase.error().await.unwrap().contains("Broken"));
    assert_eq!(before, h.usecase.items().await);

    h.usecase.clear_error().await;
    assert_eq!(h.usecase.error().await, None);
}

#[tokio::test]
async fn test_export_to_dir_writes_file() {
    let h = Harness::new();
    h.usecase.ingest().await.unwrap();
    h.usecase.regenerate_item("Mike", None).await.unwrap();

    let temp_dir = tempfile::TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("exports");
    let path = h.usecase.export_to_dir("Mike", &out_dir).await.unwrap();

    assert_eq!(path, out_dir.join("m1x_mike.png"));
    assert_eq!(std::fs::read(&path).unwrap(), support::png_bytes());
}

#[tokio::test]
async fn test_cache_is_untouched_by_regeneration() {
    let h = Harness::new();
    h.usecase.ingest().await.unwrap();
    h.usecase.regenerate_all().await.unwrap();
    assert!(h.cache.load().await.unwrap().is_empty());
}
