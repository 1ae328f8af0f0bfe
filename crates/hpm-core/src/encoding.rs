//! Binary-to-text image encodings.
//!
//! Specimen assets and generated portraits travel through the matrix as
//! base64 payloads tagged with a media type. The same pair renders to a
//! `data:` URL for display and export.

use crate::error::{MatrixError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};

/// 1x1 transparent GIF used when a specimen's source image cannot be fetched.
pub const FALLBACK_IMAGE_BASE64: &str = "R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

/// Media type of [`FALLBACK_IMAGE_BASE64`].
pub const FALLBACK_IMAGE_MIME: &str = "image/gif";

/// Media type assumed when a fetch response does not declare one.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// A base64 payload together with its media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    /// Standard base64 (no `data:` prefix)
    pub data: String,
    /// MIME type, e.g. `image/png`
    pub mime_type: String,
}

impl EncodedImage {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Encodes raw bytes.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self::new(BASE64_STANDARD.encode(bytes), mime_type)
    }

    /// The placeholder substituted for failed asset fetches.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_IMAGE_BASE64, FALLBACK_IMAGE_MIME)
    }

    pub fn is_fallback(&self) -> bool {
        self.data == FALLBACK_IMAGE_BASE64 && self.mime_type == FALLBACK_IMAGE_MIME
    }

    /// Decodes the payload back into bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(BASE64_STANDARD.decode(self.data.trim())?)
    }

    /// Renders as `data:<mime>;base64,<data>`.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Parses a base64 `data:` URL.
    ///
    /// Only the base64 form is accepted; the payload is validated by decoding it.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| MatrixError::decode("not a data URL"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| MatrixError::decode("data URL has no payload separator"))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| MatrixError::decode("data URL is not base64 encoded"))?;
        if mime_type.is_empty() || !mime_type.contains('/') {
            return Err(MatrixError::decode(format!(
                "invalid media type '{mime_type}'"
            )));
        }
        if payload.is_empty() {
            return Err(MatrixError::decode("data URL payload is empty"));
        }

        let image = Self::new(payload, mime_type);
        image.decode()?;
        Ok(image)
    }
}

/// Guesses an image media type from magic bytes.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

/// Media type of an uploaded image.
///
/// Order of precedence: a declared `image/*` type, the magic bytes, then the
/// file name extension. Returns `None` when nothing identifies an image.
pub fn resolve_upload_mime(
    declared: Option<&str>,
    file_name: Option<&str>,
    bytes: &[u8],
) -> Option<String> {
    let declared = declared
        .map(|mime| mime.trim().to_ascii_lowercase())
        .filter(|mime| mime.starts_with("image/"));
    if declared.is_some() {
        return declared;
    }

    if let Some(sniffed) = sniff_image_mime(bytes) {
        return Some(sniffed.to_string());
    }

    file_name
        .and_then(|name| mime_guess::from_path(name).first())
        .map(|mime| mime.essence_str().to_string())
        .filter(|mime| mime.starts_with("image/"))
}
