//! Conversion of rendered images into downloadable files.

use crate::encoding::EncodedImage;
use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// File stem used when a title sanitizes to nothing.
const DEFAULT_STEM: &str = "persona";

/// A decoded image ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Decodes `data_url` and names the result after `title`.
///
/// Pure conversion: fails with a decode error on a malformed URL and never
/// touches the network.
pub fn export_image(data_url: &str, title: &str) -> Result<ExportedImage> {
    let image = EncodedImage::from_data_url(data_url)?;
    let bytes = image.decode()?;
    let file_name = format!(
        "{}.{}",
        sanitize_file_stem(title),
        extension_for_mime(&image.mime_type)
    );
    Ok(ExportedImage {
        file_name,
        mime_type: image.mime_type,
        bytes,
    })
}

/// Lower-cases `title` and collapses every run of non-alphanumerics to `_`.
pub fn sanitize_file_stem(title: &str) -> String {
    let lowered = title.to_lowercase();
    let replaced = NON_ALPHANUMERIC.replace_all(&lowered, "_");
    let trimmed = replaced.trim_matches('_');
    if trimmed.is_empty() {
        DEFAULT_STEM.to_string()
    } else {
        trimmed.to_string()
    }
}

/// File extension for an image media type.
pub fn extension_for_mime(mime_type: &str) -> String {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/png" => "png".to_string(),
        "image/jpeg" | "image/jpg" => "jpg".to_string(),
        "image/gif" => "gif".to_string(),
        "image/webp" => "webp".to_string(),
        other => mime_guess::get_mime_extensions_str(other)
            .and_then(|exts| exts.first())
            .map(|ext| ext.to_string())
            .unwrap_or_else(|| "bin".to_string()),
    }
}
