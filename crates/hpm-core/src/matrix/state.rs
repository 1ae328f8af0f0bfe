//! Session-lifetime matrix state container.

use super::item::{ItemPatch, MatrixItem};
use super::reducer::merge_in_place;
use crate::persona::UsedAdjectiveSet;
use crate::specimen::Specimen;
use serde::Serialize;

/// Everything the matrix knows during a session.
///
/// The coordinator owns exactly one of these; mutations go through
/// [`MatrixState::apply`] so updates stay keyed by item identity.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixState {
    /// Built-in and custom specimens, in display order
    pub specimens: Vec<Specimen>,
    /// One view item per specimen, same order
    pub items: Vec<MatrixItem>,
    /// Adjectives already used in generated titles
    pub used_adjectives: UsedAdjectiveSet,
    /// Process-wide error banner
    pub error: Option<String>,
    /// Whether an ingest has been committed
    pub ingested: bool,
}

impl MatrixState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(&self, id: &str) -> Option<&MatrixItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn specimen(&self, id: &str) -> Option<&Specimen> {
        self.specimens.iter().find(|specimen| specimen.id == id)
    }

    /// Looks up a specimen by display name, case-insensitively.
    pub fn specimen_by_name(&self, name: &str) -> Option<&Specimen> {
        let name = name.trim();
        self.specimens
            .iter()
            .find(|specimen| specimen.name.eq_ignore_ascii_case(name))
    }

    /// True while any item is mid-regeneration.
    pub fn any_generating(&self) -> bool {
        self.items.iter().any(|item| item.is_generating)
    }

    /// Number of items showing generated content.
    pub fn hydrated_count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_staged).count()
    }

    /// User-added specimens, i.e. what belongs in the session cache.
    pub fn custom_specimens(&self) -> Vec<Specimen> {
        self.specimens
            .iter()
            .filter(|specimen| specimen.is_custom)
            .cloned()
            .collect()
    }

    /// Applies `patch` to one item. Returns whether the item exists.
    pub fn apply(&mut self, id: &str, patch: &ItemPatch) -> bool {
        merge_in_place(&mut self.items, id, patch)
    }

    /// Applies `patch` to every item.
    pub fn apply_all(&mut self, patch: &ItemPatch) {
        for item in &mut self.items {
            patch.apply_to(item);
        }
    }

    /// Removes a specimen and its item. Returns the removed specimen.
    pub fn remove(&mut self, id: &str) -> Option<Specimen> {
        let index = self.specimens.iter().position(|s| s.id == id)?;
        self.items.retain(|item| item.id != id);
        Some(self.specimens.remove(index))
    }
}
