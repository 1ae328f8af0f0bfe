//! Gemini REST implementations of the persona collaborators.
//!
//! `GeminiMetadataGenerator` asks a text model for schema-constrained persona
//! JSON; `GeminiImageGenerator` asks an image model for a portrait, passing
//! the specimen likeness inline when one is available.

pub mod gemini_client;
pub mod image_generator;
pub mod metadata_generator;
pub mod prompt;

pub use gemini_client::GeminiClient;
pub use image_generator::GeminiImageGenerator;
pub use metadata_generator::{GeminiMetadataGenerator, parse_personas};
pub use prompt::PromptTemplates;
