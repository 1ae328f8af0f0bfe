//! Error types for the persona matrix.

use thiserror::Error;

/// A shared error type for the whole matrix workspace.
///
/// Variants follow the failure taxonomy of the coordinator: asset fetches,
/// generation calls, malformed generator output, data-URL decoding, and the
/// guards on custom specimens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// Remote asset could not be fetched
    #[error("Fetch error: {url} - {message}")]
    Fetch { url: String, message: String },

    /// The external generation API call failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// The generation API answered with something we could not interpret
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A binary-to-text encoding could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// User input was rejected
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Built-in specimens cannot be removed
    #[error("Specimen '{0}' is built-in and cannot be deleted")]
    NotDeletable(String),

    /// Another regeneration is still in flight
    #[error("Matrix is busy: {0}")]
    Busy(String),

    /// Session cache read/write failure
    #[error("Session cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },
}

impl MatrixError {
    /// Creates a Fetch error
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a Generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Creates an InvalidResponse error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Creates a Decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Cache error
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came from the generation API (either transport or payload).
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation(_) | Self::InvalidResponse(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for MatrixError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for MatrixError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MatrixError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<base64::DecodeError> for MatrixError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

/// A type alias for `Result<T, MatrixError>`.
pub type Result<T> = std::result::Result<T, MatrixError>;
