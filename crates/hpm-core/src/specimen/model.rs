//! Specimen domain model.
//!
//! A specimen is a character entry: a name, its first-letter tag, a source
//! image (remote URL and/or cached encoding) and the staged placeholder text
//! shown before any generation happens.

use crate::encoding::EncodedImage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix for identifiers of user-uploaded specimens.
pub const CUSTOM_ID_PREFIX: &str = "custom-";

/// Staged description given to freshly uploaded specimens.
pub const CUSTOM_STAGED_DESCRIPTION: &str =
    "A newly catalogued specimen awaiting temporal reconstruction.";

/// A character entry in the matrix roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specimen {
    /// Stable identifier; built-ins use their name, uploads `custom-<uuid>`
    pub id: String,
    /// Display name
    pub name: String,
    /// First-letter tag used to alliterate generated titles
    pub letter: String,
    /// Remote source image, absent for uploads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Cached encoding of the source image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<EncodedImage>,
    /// Placeholder title shown while staged
    pub staged_title: String,
    /// Placeholder description shown while staged
    pub staged_description: String,
    /// Whether the user supplied this specimen during the session
    #[serde(default)]
    pub is_custom: bool,
    /// Upload time for custom specimens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl Specimen {
    /// Builds a built-in specimen referencing a remote image.
    pub fn builtin(
        name: impl Into<String>,
        source_url: impl Into<String>,
        staged_title: impl Into<String>,
        staged_description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            letter: letter_tag(&name),
            name,
            source_url: Some(source_url.into()),
            asset: None,
            staged_title: staged_title.into(),
            staged_description: staged_description.into(),
            is_custom: false,
            added_at: None,
        }
    }

    /// Builds a user-uploaded specimen whose source lives only as `asset`.
    ///
    /// The caller is responsible for validating `name`.
    pub fn custom(name: impl Into<String>, asset: EncodedImage) -> Self {
        let name = name.into();
        Self {
            id: format!("{}{}", CUSTOM_ID_PREFIX, uuid::Uuid::new_v4()),
            letter: letter_tag(&name),
            staged_title: name.clone(),
            name,
            source_url: None,
            asset: Some(asset),
            staged_description: CUSTOM_STAGED_DESCRIPTION.to_string(),
            is_custom: true,
            added_at: Some(Utc::now()),
        }
    }

    pub fn has_asset(&self) -> bool {
        self.asset.is_some()
    }
}

/// Upper-cased first character of a name, or an empty tag for an empty name.
pub fn letter_tag(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}
