//! Specimen domain module.
//!
//! # Module Structure
//!
//! - `model`: `Specimen` and its constructors
//! - `preset`: the built-in roster
//! - `cache`: session-scoped cache trait for custom specimens

mod cache;
mod model;
mod preset;

pub use cache::SpecimenCache;
pub use model::{CUSTOM_ID_PREFIX, CUSTOM_STAGED_DESCRIPTION, Specimen, letter_tag};
pub use preset::builtin_specimens;
