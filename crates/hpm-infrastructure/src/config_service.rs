//! Configuration and secret loading.
//!
//! Reads `config.toml` and `secret.json` from the config directory (or an
//! explicit base directory). Missing files mean defaults; malformed files are
//! errors. The Gemini key may be overridden from the environment.

use crate::paths::MatrixPaths;
use hpm_core::config::{MatrixConfig, SecretConfig};
use hpm_core::error::{MatrixError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variables checked for the Gemini key, in priority order.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Loads configuration files for the matrix.
#[derive(Debug, Clone)]
pub struct ConfigService {
    config_path: PathBuf,
    secret_path: PathBuf,
}

impl ConfigService {
    /// Creates a service rooted at `base_dir`, or the platform config dir when `None`.
    pub fn new(base_dir: Option<&Path>) -> Result<Self> {
        let base = match base_dir {
            Some(dir) => dir.to_path_buf(),
            None => MatrixPaths::config_dir().map_err(|e| MatrixError::config(e.to_string()))?,
        };
        Ok(Self {
            config_path: base.join("config.toml"),
            secret_path: base.join("secret.json"),
        })
    }

    /// Uses an explicit `config.toml`; `secret.json` is looked up next to it.
    pub fn with_config_file(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let secret_path = config_path
            .parent()
            .map(|dir| dir.join("secret.json"))
            .unwrap_or_else(|| PathBuf::from("secret.json"));
        Self {
            config_path,
            secret_path,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Loads `config.toml`, falling back to defaults if it does not exist or is empty.
    pub fn load_config(&self) -> Result<MatrixConfig> {
        if !self.config_path.exists() {
            tracing::debug!(
                "[Config] No config file at {:?}, using defaults",
                self.config_path
            );
            return Ok(MatrixConfig::default());
        }

        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            MatrixError::config(format!(
                "Failed to read config file at {:?}: {}",
                self.config_path, e
            ))
        })?;

        if content.trim().is_empty() {
            return Ok(MatrixConfig::default());
        }

        toml::from_str(&content).map_err(|e| {
            MatrixError::config(format!(
                "Failed to parse config file at {:?}: {}",
                self.config_path, e
            ))
        })
    }

    /// Loads `secret.json`; a missing file yields an empty config.
    pub fn load_secrets(&self) -> Result<SecretConfig> {
        if !self.secret_path.exists() {
            return Ok(SecretConfig::default());
        }

        let content = fs::read_to_string(&self.secret_path).map_err(|e| {
            MatrixError::config(format!(
                "Failed to read secret file at {:?}: {}",
                self.secret_path, e
            ))
        })?;

        // Never include the content in the error, it holds keys
        serde_json::from_str(&content).map_err(|e| {
            MatrixError::config(format!(
                "Failed to parse secret file at {:?}: line {}",
                self.secret_path,
                e.line()
            ))
        })
    }

    /// Resolves the Gemini API key from the environment, then `secret.json`.
    pub fn gemini_api_key(&self) -> Result<String> {
        let from_env = API_KEY_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty());
        if let Some(key) = from_env {
            return Ok(key);
        }

        self.load_secrets()?
            .gemini
            .map(|gemini| gemini.api_key)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                MatrixError::config(format!(
                    "Gemini API key not found: set {} or add gemini.api_key to {:?}",
                    API_KEY_ENV_VARS.join("/"),
                    self.secret_path
                ))
            })
    }
}
