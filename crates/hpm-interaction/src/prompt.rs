//! Prompt templates for persona metadata and portrait rendering.

use hpm_core::error::{MatrixError, Result};
use hpm_core::generator::{ImageRequest, MetadataRequest};
use minijinja::{Environment, context};

const METADATA_TEMPLATE: &str = r#"For each of the following characters, generate exactly one hyper-realistic 'Temporal Variant'.
Characters: {% for s in specimens %}{{ s.name }} (letter {{ s.letter }}){% if not loop.last %}, {% endif %}{% endfor %}.

RULES:
1. The title MUST be '[Adjective] [Name]' where the adjective starts with the character's letter (e.g. 'Dangerous Derrick', 'Exquisite Eleven').
2. ERA DIVERSITY: Place each character in a specific, identifiable historical or modern period, such as the 1920s Jazz Age, the 17th century Dutch Golden Age, 1950s Americana, the 1990s London underground, or contemporary high society.
3. PHOTOREALISM: Describe authentic detail: textures, period-correct attire, natural lighting (twilight, overcast morning) and grounded environments.
4. Focus on absolute realism and human presence.
{%- if excluded_themes %}
5. Do NOT reuse any of these adjectives or their themes: {{ excluded_themes | join(", ") }}.
{%- endif %}
{%- if forced_theme %}
THEME: Build every title and scene around "{{ forced_theme }}".
{%- endif %}

Set characterName to the character's name exactly as listed above."#;

const IMAGE_TEMPLATE: &str = r#"{% if with_likeness %}TEMPORAL RECONSTRUCTION: Extract the facial likeness from the provided image and render it into this new reality: {% endif -%}
A high-fidelity, photorealistic cinematic portrait of {{ character_name }} reimagined as "{{ title }}".
SCENE: {{ description }}
STYLE: Captured on 35mm film with authentic grain, shallow depth of field, natural skin texture and period-accurate lighting. The result should look like an iconic piece of professional photography. 100% human realism."#;

/// Compiled prompt templates.
pub struct PromptTemplates {
    env: Environment<'static>,
}

impl PromptTemplates {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("metadata", METADATA_TEMPLATE)
            .map_err(template_error)?;
        env.add_template("image", IMAGE_TEMPLATE)
            .map_err(template_error)?;
        Ok(Self { env })
    }

    /// Renders the persona metadata prompt.
    pub fn metadata_prompt(&self, request: &MetadataRequest) -> Result<String> {
        let forced_theme = request
            .forced_theme
            .as_deref()
            .map(str::trim)
            .filter(|theme| !theme.is_empty());

        self.env
            .get_template("metadata")
            .and_then(|template| {
                template.render(context! {
                    specimens => &request.specimens,
                    excluded_themes => &request.excluded_themes,
                    forced_theme => forced_theme,
                })
            })
            .map_err(template_error)
    }

    /// Renders the portrait prompt; the likeness instruction is only included
    /// when a source image accompanies the request.
    pub fn image_prompt(&self, request: &ImageRequest) -> Result<String> {
        self.env
            .get_template("image")
            .and_then(|template| {
                template.render(context! {
                    with_likeness => request.source.is_some(),
                    character_name => &request.character_name,
                    title => &request.title,
                    description => &request.description,
                })
            })
            .map_err(template_error)
    }
}

fn template_error(err: minijinja::Error) -> MatrixError {
    MatrixError::generation(format!("Prompt template error: {err}"))
}
