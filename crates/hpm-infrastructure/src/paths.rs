//! Unified path management for matrix files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/hpm/                 # Config directory
//! ├── config.toml                # Tunables (models, timeouts, policy)
//! ├── secret.json                # API keys
//! └── logs/                      # Daily-rolling CLI logs
//!
//! <tmp>/hpm/sessions/<id>/       # Session-scoped data, removed at session end
//! └── custom_specimens.json
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

const APP_DIR: &str = "hpm";

/// Unified path management for the matrix.
pub struct MatrixPaths;

impl MatrixPaths {
    /// Returns the configuration directory (e.g. `~/.config/hpm/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to `secret.json`.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600).
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }

    /// Root of all session-scoped directories.
    ///
    /// Lives under the system temp directory so it never outlives the machine session.
    pub fn sessions_dir() -> PathBuf {
        std::env::temp_dir().join(APP_DIR).join("sessions")
    }

    /// Directory of one session.
    pub fn session_dir(session_id: &str) -> PathBuf {
        Self::sessions_dir().join(session_id)
    }
}
