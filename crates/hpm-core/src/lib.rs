//! Domain layer for the Hawkins Persona Matrix.
//!
//! Holds the specimen roster, the per-item view state and its reducer, the
//! binary-to-text image plumbing, and the collaborator traits that the
//! application layer drives.

pub mod config;
pub mod encoding;
pub mod error;
pub mod event;
pub mod export;
pub mod generator;
pub mod matrix;
pub mod persona;
pub mod specimen;

// Re-export common types
pub use encoding::EncodedImage;
pub use error::{MatrixError, Result};
pub use event::{EventSink, MatrixEvent};
pub use matrix::{ItemPatch, ItemPhase, MatrixItem, MatrixState};
pub use persona::{GeneratedPersona, UsedAdjectiveSet};
pub use specimen::{Specimen, SpecimenCache};
