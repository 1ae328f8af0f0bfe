//! Collaborator interfaces for the external generation API and asset fetching.
//!
//! The coordinator only ever sees these traits; concrete Gemini and HTTP
//! implementations live in the interaction and infrastructure crates.

use crate::encoding::EncodedImage;
use crate::error::Result;
use crate::persona::GeneratedPersona;
use crate::specimen::Specimen;
use serde::{Deserialize, Serialize};

/// The part of a specimen the metadata generator needs to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecimenDescriptor {
    pub name: String,
    pub letter: String,
}

impl From<&Specimen> for SpecimenDescriptor {
    fn from(specimen: &Specimen) -> Self {
        Self {
            name: specimen.name.clone(),
            letter: specimen.letter.clone(),
        }
    }
}

/// Request for one persona per specimen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRequest {
    /// Specimens in display order
    pub specimens: Vec<SpecimenDescriptor>,
    /// Adjectives/themes that must not be reused
    #[serde(default)]
    pub excluded_themes: Vec<String>,
    /// User-forced theme word
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forced_theme: Option<String>,
}

/// Request for one portrait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub character_name: String,
    pub title: String,
    pub description: String,
    /// Likeness reference; `None` when only the fallback placeholder is available
    pub source: Option<EncodedImage>,
}

impl ImageRequest {
    /// Builds a request from generated metadata and a specimen's cached asset.
    ///
    /// The fallback placeholder carries no likeness and is not forwarded.
    pub fn for_persona(persona: &GeneratedPersona, asset: Option<&EncodedImage>) -> Self {
        Self {
            character_name: persona.character_name.clone(),
            title: persona.title.clone(),
            description: persona.description.clone(),
            source: asset.filter(|a| !a.is_fallback()).cloned(),
        }
    }
}

/// Produces structured persona metadata.
///
/// The response is best-effort: it may contain fewer personas than requested.
/// Output that cannot be parsed must surface as an error.
#[async_trait::async_trait]
pub trait MetadataGenerator: Send + Sync {
    async fn generate_personas(&self, request: &MetadataRequest) -> Result<Vec<GeneratedPersona>>;
}

/// Renders a portrait for a persona.
///
/// Must fail explicitly when the backend returns no image payload.
#[async_trait::async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, request: &ImageRequest) -> Result<EncodedImage>;
}

/// Fetches a remote resource and encodes it.
///
/// Callers substitute [`EncodedImage::fallback`] on error.
#[async_trait::async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<EncodedImage>;
}
