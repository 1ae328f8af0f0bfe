//! Application layer for the persona matrix.
//!
//! Provides the use case that coordinates specimen ingestion, persona
//! regeneration, custom specimens and export on top of the domain types.

pub mod matrix_usecase;
pub mod outcome;

pub use matrix_usecase::MatrixUseCase;
pub use outcome::{BatchReport, ItemFailure, RegenerateOutcome};
