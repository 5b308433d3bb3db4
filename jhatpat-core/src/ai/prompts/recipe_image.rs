//! Recipe image prompt.

/// Prompt name for cache keys.
pub const RECIPE_IMAGE_PROMPT_NAME: &str = "recipe_image";

pub fn render_recipe_image_prompt(recipe_name: &str) -> String {
    format!(
        "Generate a visually appealing and appetizing photograph-style image of the Indian dish named \"{}\". \
The image should be high quality, well-lit, and suitable for a recipe website. Focus on the food itself.",
        recipe_name
    )
}
