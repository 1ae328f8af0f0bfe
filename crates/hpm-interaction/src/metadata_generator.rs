//! Gemini-backed [`MetadataGenerator`].

use crate::gemini_client::{GeminiClient, GenerateContentRequest, GenerationConfig, Part};
use crate::prompt::PromptTemplates;
use async_trait::async_trait;
use hpm_core::error::{MatrixError, Result};
use hpm_core::generator::{MetadataGenerator, MetadataRequest};
use hpm_core::persona::GeneratedPersona;
use serde_json::json;
use std::sync::Arc;

/// Requests persona metadata as schema-constrained JSON from a text model.
pub struct GeminiMetadataGenerator {
    client: GeminiClient,
    model: String,
    templates: Arc<PromptTemplates>,
}

impl GeminiMetadataGenerator {
    pub fn new(
        client: GeminiClient,
        model: impl Into<String>,
        templates: Arc<PromptTemplates>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            templates,
        }
    }
}

#[async_trait]
impl MetadataGenerator for GeminiMetadataGenerator {
    async fn generate_personas(&self, request: &MetadataRequest) -> Result<Vec<GeneratedPersona>> {
        if request.specimens.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = self.templates.metadata_prompt(request)?;
        let body = GenerateContentRequest::user(
            vec![Part::text(prompt)],
            GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(persona_schema()),
                ..Default::default()
            },
        );

        tracing::debug!(
            "[Metadata] Requesting {} persona(s) from {} ({} excluded theme(s))",
            request.specimens.len(),
            self.model,
            request.excluded_themes.len()
        );

        let text = self
            .client
            .generate_content(&self.model, &body)
            .await?
            .into_text()?;
        parse_personas(&text)
    }
}

/// Response schema: an array of `{characterName, title, description}`.
fn persona_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "characterName": { "type": "STRING" },
                "title": { "type": "STRING" },
                "description": { "type": "STRING" }
            },
            "required": ["characterName", "title", "description"]
        }
    })
}

/// Parses model output into personas.
///
/// Tolerates a surrounding markdown code fence. Anything that is not a JSON
/// array of personas is an [`MatrixError::InvalidResponse`].
pub fn parse_personas(text: &str) -> Result<Vec<GeneratedPersona>> {
    let body = strip_code_fence(text);
    serde_json::from_str::<Vec<GeneratedPersona>>(body)
        .map_err(|e| MatrixError::invalid_response(format!("Failed to parse personas JSON: {e}")))
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
