//! HTTP implementation of [`AssetFetcher`].

use async_trait::async_trait;
use hpm_core::encoding::{DEFAULT_IMAGE_MIME, EncodedImage};
use hpm_core::error::{MatrixError, Result};
use hpm_core::generator::AssetFetcher;
use std::time::Duration;

/// Downloads specimen source images over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpAssetFetcher {
    client: reqwest::Client,
}

impl HttpAssetFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MatrixError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, url: &str) -> Result<EncodedImage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MatrixError::fetch(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MatrixError::fetch(url, format!("HTTP {status}")));
        }

        let mime_type = media_type(
            response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
        );

        let bytes = response
            .bytes()
            .await
            .map_err(|e| MatrixError::fetch(url, e.to_string()))?;

        if bytes.is_empty() {
            return Err(MatrixError::fetch(url, "empty response body"));
        }

        tracing::debug!(
            "[Fetch] {} -> {} bytes ({})",
            url,
            bytes.len(),
            mime_type
        );
        Ok(EncodedImage::from_bytes(&bytes, mime_type))
    }
}

/// Strips parameters from a `Content-Type` header, defaulting to JPEG.
fn media_type(content_type: Option<&str>) -> String {
    content_type
        .and_then(|value| value.split(';').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_IMAGE_MIME)
        .to_ascii_lowercase()
}
