//! Prompt for modifying an existing recipe on request.

/// Prompt name for cache keys.
pub const IMPROVE_RECIPE_PROMPT_NAME: &str = "improve_recipe";

pub fn render_improve_recipe_system_prompt() -> String {
    r#"You are an expert chef specializing in modifying recipes. You will be given a recipe and a modification request. Apply the request and return the complete modified recipe as plain text, with the name, ingredients and instructions.

Respond with JSON only, no other text: {"improvedRecipe": "string"}"#
        .to_string()
}

pub fn render_improve_recipe_user_prompt(recipe: &str, modification_request: &str) -> String {
    format!(
        "Recipe: {recipe}\nModification Request: {modification_request}",
        recipe = recipe,
        modification_request = modification_request
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_user_prompt() {
        let prompt = render_improve_recipe_user_prompt("Dal Tadka", "make it less spicy");
        assert!(prompt.contains("Recipe: Dal Tadka"));
        assert!(prompt.contains("Modification Request: make it less spicy"));
    }

    #[test]
    fn test_render_system_prompt() {
        assert!(render_improve_recipe_system_prompt().contains("improvedRecipe"));
    }
}
