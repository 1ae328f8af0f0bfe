//! Gemini-backed [`ImageGenerator`].

use crate::gemini_client::{GeminiClient, GenerateContentRequest, GenerationConfig, ImageConfig, Part};
use crate::prompt::PromptTemplates;
use async_trait::async_trait;
use hpm_core::encoding::EncodedImage;
use hpm_core::error::Result;
use hpm_core::generator::{ImageGenerator, ImageRequest};
use std::sync::Arc;

/// Media type assumed when the image model omits one.
const DEFAULT_OUTPUT_MIME: &str = "image/png";

/// Renders portraits with an image model, optionally guided by a likeness reference.
pub struct GeminiImageGenerator {
    client: GeminiClient,
    model: String,
    aspect_ratio: String,
    templates: Arc<PromptTemplates>,
}

impl GeminiImageGenerator {
    pub fn new(
        client: GeminiClient,
        model: impl Into<String>,
        aspect_ratio: impl Into<String>,
        templates: Arc<PromptTemplates>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            aspect_ratio: aspect_ratio.into(),
            templates,
        }
    }

    fn build_request(&self, request: &ImageRequest) -> Result<GenerateContentRequest> {
        let mut parts = Vec::with_capacity(2);
        if let Some(source) = &request.source {
            parts.push(Part::image(source));
        }
        parts.push(Part::text(self.templates.image_prompt(request)?));

        Ok(GenerateContentRequest::user(
            parts,
            GenerationConfig {
                image_config: Some(ImageConfig {
                    aspect_ratio: self.aspect_ratio.clone(),
                }),
                ..Default::default()
            },
        ))
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageGenerator {
    async fn generate_image(&self, request: &ImageRequest) -> Result<EncodedImage> {
        let body = self.build_request(request)?;

        tracing::debug!(
            "[Image] Rendering '{}' with {} (likeness: {})",
            request.title,
            self.model,
            request.source.is_some()
        );

        self.client
            .generate_content(&self.model, &body)
            .await?
            .into_image(DEFAULT_OUTPUT_MIME)
    }
}
