//! Recipe image generation.

use crate::ai::prompts::recipe_image::{render_recipe_image_prompt, RECIPE_IMAGE_PROMPT_NAME};
use crate::ai::{AiClient, AiError, ImageRequest};
use crate::image::validate_data_uri;

/// Generate an image for the named dish, returned as a data URI.
pub async fn generate_recipe_image(
    ai_client: &dyn AiClient,
    recipe_name: &str,
) -> Result<String, AiError> {
    let request = ImageRequest {
        prompt: render_recipe_image_prompt(recipe_name),
        size: None,
    };

    let response = ai_client
        .generate_image(RECIPE_IMAGE_PROMPT_NAME, request)
        .await?;

    let content_type = validate_data_uri(&response.data_uri).map_err(AiError::InvalidImage)?;

    tracing::debug!(
        recipe = recipe_name,
        content_type = %content_type,
        cached = response.cached,
        "Generated recipe image"
    );

    Ok(response.data_uri)
}
