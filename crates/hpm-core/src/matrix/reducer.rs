//! Identity-keyed reducer for the item collection.
//!
//! Asynchronous completions must never overwrite the whole collection with a
//! snapshot captured before an await. They describe what changed for one item
//! and the reducer folds that into whatever the collection is *now*.

use super::item::{ItemPatch, MatrixItem};

/// Returns a new collection with `patch` applied to the item whose id is `id`.
///
/// Every other item is carried over unchanged. An unknown id yields an
/// unchanged copy, so completions for items deleted mid-flight are dropped.
pub fn merge(items: &[MatrixItem], id: &str, patch: &ItemPatch) -> Vec<MatrixItem> {
    items
        .iter()
        .map(|item| {
            if item.id == id {
                let mut next = item.clone();
                patch.apply_to(&mut next);
                next
            } else {
                item.clone()
            }
        })
        .collect()
}

/// In-place variant of [`merge`]. Returns whether an item matched.
pub fn merge_in_place(items: &mut [MatrixItem], id: &str, patch: &ItemPatch) -> bool {
    match items.iter_mut().find(|item| item.id == id) {
        Some(item) => {
            patch.apply_to(item);
            true
        }
        None => false,
    }
}
