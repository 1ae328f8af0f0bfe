//! Thin REST client for the Gemini `generateContent` endpoint.
//!
//! Shared by the metadata and image generators. Only the request/response
//! fields the matrix uses are modelled.

use hpm_core::config::GeminiSettings;
use hpm_core::encoding::EncodedImage;
use hpm_core::error::{MatrixError, Result};
use hpm_infrastructure::ConfigService;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Authenticated Gemini client bound to one base URL.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiClient {
    /// Creates a client with the configured request timeout.
    pub fn new(api_key: impl Into<String>, settings: &GeminiSettings) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(MatrixError::config("Gemini API key is empty"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| MatrixError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolves the API key through `service` (environment first, then `secret.json`).
    pub fn try_from_config(service: &ConfigService, settings: &GeminiSettings) -> Result<Self> {
        let api_key = service.gemini_api_key()?;
        Self::new(api_key, settings)
    }

    /// Calls `generateContent` on `model`.
    pub(crate) async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            api_key = self.api_key
        );

        // URLs carry the key, strip them from transport errors
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                MatrixError::generation(format!(
                    "Gemini API request failed: {}",
                    err.without_url()
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        response.json().await.map_err(|err| {
            MatrixError::invalid_response(format!(
                "Failed to parse Gemini response: {}",
                err.without_url()
            ))
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Single user turn made of `parts`.
    pub fn user(parts: Vec<Part>, generation_config: GenerationConfig) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            generation_config: Some(generation_config),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image(image: &EncodedImage) -> Self {
        Self::InlineData {
            inline_data: InlineDataPayload {
                mime_type: image.mime_type.clone(),
                data: image.data.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineDataPayload {
    #[serde(default)]
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageConfig {
    pub aspect_ratio: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    pub content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentResponse {
    #[serde(default)]
    pub parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PartResponse {
    pub text: Option<String>,
    pub inline_data: Option<InlineDataPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

impl GenerateContentResponse {
    fn into_parts(self) -> Vec<PartResponse> {
        self.candidates
            .and_then(|candidates| candidates.into_iter().next())
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .unwrap_or_default()
    }

    fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
    }

    /// Concatenated text of the first candidate.
    pub fn into_text(self) -> Result<String> {
        if let Some(reason) = self.block_reason() {
            return Err(MatrixError::generation(format!("Prompt blocked: {reason}")));
        }

        let text: String = self
            .into_parts()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if text.trim().is_empty() {
            return Err(MatrixError::invalid_response(
                "Gemini API returned no text in the response candidates",
            ));
        }
        Ok(text)
    }

    /// First inline image of the first candidate.
    pub fn into_image(self, default_mime: &str) -> Result<EncodedImage> {
        if let Some(reason) = self.block_reason() {
            return Err(MatrixError::generation(format!("Prompt blocked: {reason}")));
        }

        self.into_parts()
            .into_iter()
            .find_map(|part| part.inline_data)
            .filter(|inline| !inline.data.is_empty())
            .map(|inline| {
                let mime_type = if inline.mime_type.is_empty() {
                    default_mime.to_string()
                } else {
                    inline.mime_type
                };
                EncodedImage::new(inline.data, mime_type)
            })
            .ok_or_else(|| MatrixError::generation("No image data returned from Gemini"))
    }
}

fn map_http_error(status: StatusCode, body: &str) -> MatrixError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    MatrixError::generation(format!("HTTP {}: {}", status.as_u16(), message))
}
