//! Recipe generation prompt.

use crate::staples::STAPLE_INGREDIENTS;

/// Prompt name for cache keys.
pub const GENERATE_RECIPE_PROMPT_NAME: &str = "generate_recipe";

/// Most recipes a single generation may return.
pub const MAX_RECIPES: usize = 3;

/// Render the recipe generation prompt for the user's ingredients.
pub fn render_generate_recipe_prompt(ingredients: &str) -> String {
    let staples = STAPLE_INGREDIENTS.join(", ");

    format!(
        r#"You are a creative recipe generator specializing in quick Indian home cooking.
Based on the ingredients provided by the user: {ingredients}

Generate between 1 and {max} distinct recipes. For every recipe you MUST provide:
1. A concise and appealing "recipeName".
2. A list of "ingredients" required for the recipe. Common kitchen staples ({staples}) must be EXCLUDED from this list. It may include other non-staple items you deem necessary that were not in the user's list, and it may be empty if only staples are needed.
3. Clear, step-by-step "instructions", one step per line.

Respond with JSON only, no other text:
{{"recipes": [{{"recipeName": "string", "ingredients": ["string"], "instructions": "string"}}]}}"#,
        ingredients = ingredients,
        max = MAX_RECIPES,
        staples = staples
    )
}
