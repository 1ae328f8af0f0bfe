//! View-state change notifications.
//!
//! The coordinator publishes these over an unbounded channel so a front end
//! can redraw incrementally. Dropped receivers are ignored.

use crate::matrix::MatrixItem;
use crate::persona::GeneratedPersona;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum MatrixEvent {
    /// One more specimen processed during ingest
    IngestProgress { completed: usize, total: usize },
    /// The whole collection was (re)built
    ItemsReset(Vec<MatrixItem>),
    /// Items entered the generating state
    GenerationStarted(Vec<String>),
    /// Metadata for an item is known; its image is still rendering
    PersonaDrafted {
        item_id: String,
        persona: GeneratedPersona,
    },
    /// An item changed
    ItemUpdated(MatrixItem),
    /// An item's regeneration failed
    ItemFailed { item_id: String, message: String },
    /// Process-wide error banner set
    ErrorRaised(String),
    SpecimenAdded(MatrixItem),
    SpecimenRemoved(String),
}

impl MatrixEvent {
    /// Fractional ingest progress in `0.0..=1.0`, if this is a progress event.
    pub fn progress_fraction(&self) -> Option<f32> {
        match self {
            Self::IngestProgress { completed, total } if *total > 0 => {
                Some(*completed as f32 / *total as f32)
            }
            Self::IngestProgress { .. } => Some(1.0),
            _ => None,
        }
    }
}

/// Optional event sink.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<UnboundedSender<MatrixEvent>>,
}

impl EventSink {
    pub fn new(sender: UnboundedSender<MatrixEvent>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// A sink that discards everything.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: MatrixEvent) {
        if let Some(sender) = &self.sender {
            // Receiver gone means nobody is watching
            let _ = sender.send(event);
        }
    }
}
