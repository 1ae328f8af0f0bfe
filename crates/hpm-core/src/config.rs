//! Configuration models.
//!
//! `config.toml` carries tunables, `secret.json` carries the API key. Both
//! are optional on disk; every field has a default.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::{Display, EnumString};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Whether single-item regeneration records the new title adjective when the
/// user forced a thematic modifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdjectivePolicy {
    /// Record every generated adjective
    Always,
    /// Skip recording when an explicit modifier drove the theme
    #[default]
    SkipWhenModified,
}

impl AdjectivePolicy {
    pub fn should_record(self, modified: bool) -> bool {
        match self {
            Self::Always => true,
            Self::SkipWhenModified => !modified,
        }
    }
}

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixConfig {
    #[serde(default)]
    pub gemini: GeminiSettings,
    #[serde(default)]
    pub matrix: MatrixSettings,
}

/// Gemini endpoint and model selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub aspect_ratio: String,
    pub request_timeout_secs: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            aspect_ratio: "1:1".to_string(),
            request_timeout_secs: 120,
        }
    }
}

/// Coordinator behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixSettings {
    pub adjective_policy: AdjectivePolicy,
    pub fetch_timeout_secs: u64,
    /// Where exports are written when no directory is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl Default for MatrixSettings {
    fn default() -> Self {
        Self {
            adjective_policy: AdjectivePolicy::default(),
            fetch_timeout_secs: 30,
            export_dir: None,
        }
    }
}

/// Root structure of `secret.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

/// Gemini API credentials.
#[derive(Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .finish()
    }
}
