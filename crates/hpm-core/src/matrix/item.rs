//! View-state projection of a specimen.

use crate::persona::GeneratedPersona;
use crate::specimen::Specimen;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle phase of a matrix item, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItemPhase {
    /// Showing placeholder content, never successfully regenerated
    Staged,
    /// A regeneration is in flight
    Generating,
    /// Showing generated content
    Hydrated,
}

/// The live, UI-facing record for one specimen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixItem {
    /// Same as the backing specimen's id
    pub id: String,
    pub character_name: String,
    pub title: String,
    pub description: String,
    /// Data URL (or remote URL) of the image currently shown
    pub image_url: String,
    pub is_generating: bool,
    pub is_staged: bool,
    /// Backed by a user-uploaded specimen (deletable)
    #[serde(default)]
    pub is_custom: bool,
    /// Source fetch fell back to the placeholder image
    #[serde(default)]
    pub is_fallback_asset: bool,
    /// Rotating caption shown while generating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_caption: Option<String>,
    /// Free-text thematic modifier typed by the user
    #[serde(default)]
    pub modifier_input: String,
    /// Last failure attributable to this item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl MatrixItem {
    /// Creates the staged item for a specimen.
    pub fn staged(specimen: &Specimen) -> Self {
        let image_url = specimen
            .asset
            .as_ref()
            .map(|asset| asset.to_data_url())
            .or_else(|| specimen.source_url.clone())
            .unwrap_or_default();

        Self {
            id: specimen.id.clone(),
            character_name: specimen.name.clone(),
            title: specimen.staged_title.clone(),
            description: specimen.staged_description.clone(),
            image_url,
            is_generating: false,
            is_staged: true,
            is_custom: specimen.is_custom,
            is_fallback_asset: specimen.asset.as_ref().is_some_and(|a| a.is_fallback()),
            status_caption: None,
            modifier_input: String::new(),
            last_error: None,
        }
    }

    pub fn phase(&self) -> ItemPhase {
        if self.is_generating {
            ItemPhase::Generating
        } else if self.is_staged {
            ItemPhase::Staged
        } else {
            ItemPhase::Hydrated
        }
    }

    /// Non-blank modifier input, if the user typed one.
    pub fn modifier(&self) -> Option<&str> {
        let trimmed = self.modifier_input.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// A partial update to a single [`MatrixItem`].
///
/// Unset fields are left untouched. Nested options distinguish "leave alone"
/// (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_generating: Option<bool>,
    pub is_staged: Option<bool>,
    pub status_caption: Option<Option<String>>,
    pub modifier_input: Option<String>,
    pub last_error: Option<Option<String>>,
}

impl ItemPatch {
    /// Marks an item as generating and clears its previous error.
    pub fn started(caption: impl Into<String>) -> Self {
        Self {
            is_generating: Some(true),
            status_caption: Some(Some(caption.into())),
            last_error: Some(None),
            ..Self::default()
        }
    }

    /// Applies a successful generation.
    pub fn hydrated(persona: &GeneratedPersona, image_url: impl Into<String>) -> Self {
        Self {
            title: Some(persona.title.clone()),
            description: Some(persona.description.clone()),
            image_url: Some(image_url.into()),
            is_generating: Some(false),
            is_staged: Some(false),
            status_caption: Some(None),
            last_error: Some(None),
            ..Self::default()
        }
    }

    /// Records a failure; content stays as it was.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            is_generating: Some(false),
            status_caption: Some(None),
            last_error: Some(Some(message.into())),
            ..Self::default()
        }
    }

    /// Clears the generating flag without touching anything else.
    pub fn idle() -> Self {
        Self {
            is_generating: Some(false),
            status_caption: Some(None),
            ..Self::default()
        }
    }

    pub fn caption(caption: impl Into<String>) -> Self {
        Self {
            status_caption: Some(Some(caption.into())),
            ..Self::default()
        }
    }

    pub fn modifier(input: impl Into<String>) -> Self {
        Self {
            modifier_input: Some(input.into()),
            ..Self::default()
        }
    }

    /// Writes the set fields into `item`.
    pub fn apply_to(&self, item: &mut MatrixItem) {
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(image_url) = &self.image_url {
            item.image_url = image_url.clone();
        }
        if let Some(flag) = self.is_generating {
            item.is_generating = flag;
        }
        if let Some(flag) = self.is_staged {
            item.is_staged = flag;
        }
        if let Some(caption) = &self.status_caption {
            item.status_caption = caption.clone();
        }
        if let Some(input) = &self.modifier_input {
            item.modifier_input = input.clone();
        }
        if let Some(error) = &self.last_error {
            item.last_error = error.clone();
        }
    }
}
