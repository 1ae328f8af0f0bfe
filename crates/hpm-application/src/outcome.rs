//! Results reported by the matrix use case.

use hpm_core::MatrixItem;
use serde::Serialize;

/// Result of a single-item regeneration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "item", rename_all = "snake_case")]
pub enum RegenerateOutcome {
    /// The item now shows freshly generated content
    Regenerated(MatrixItem),
    /// A regeneration for this item was already in flight; nothing was requested
    AlreadyGenerating,
    /// The item was deleted before its regeneration finished
    Discarded,
}

impl RegenerateOutcome {
    pub fn item(&self) -> Option<&MatrixItem> {
        match self {
            Self::Regenerated(item) => Some(item),
            _ => None,
        }
    }
}

/// A per-item failure during batch regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFailure {
    pub item_id: String,
    pub message: String,
}

/// Summary of a batch regeneration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Items that received new content
    pub updated: Vec<MatrixItem>,
    /// Items whose image generation failed
    pub failed: Vec<ItemFailure>,
    /// Items the metadata generator returned no persona for
    pub unmatched: Vec<String>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.unmatched.is_empty()
    }
}
