//! Request handlers shared by the CLI and the HTTP server.
//!
//! Each handler validates its input, calls one AI flow and maps failures onto
//! [`ActionError`]: input problems are shown next to the field, everything
//! else becomes a notice.

use crate::ai::{self, AiClient};
use crate::error::{ActionError, InputError};
use crate::types::{Recipe, TranslatedRecipe};

/// Minimum ingredient text length, in characters, after trimming.
pub const MIN_INGREDIENTS_LEN: usize = 3;

/// Maximum ingredient text length, in characters, after trimming.
pub const MAX_INGREDIENTS_LEN: usize = 500;

/// Trim and length-check raw ingredient text.
pub fn validate_ingredients(raw: &str) -> Result<&str, InputError> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();

    if len < MIN_INGREDIENTS_LEN {
        return Err(InputError::TooShort {
            min: MIN_INGREDIENTS_LEN,
        });
    }
    if len > MAX_INGREDIENTS_LEN {
        return Err(InputError::TooLong {
            max: MAX_INGREDIENTS_LEN,
        });
    }
    Ok(trimmed)
}

/// Validate ingredients and generate recipes for them.
pub async fn handle_generate_recipe(
    client: &dyn AiClient,
    raw_ingredients: &str,
) -> Result<Vec<Recipe>, ActionError> {
    let ingredients = validate_ingredients(raw_ingredients).inspect_err(|e| {
        tracing::info!(error = %e, "Rejected ingredient input");
    })?;

    let result = ai::generate_recipes(client, ingredients)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Recipe generation failed"))?;

    tracing::info!(
        count = result.recipes.len(),
        cached = result.cached,
        tokens = result.usage.total_tokens,
        "Generated recipes"
    );
    Ok(result.recipes)
}

/// Translate a recipe into `language`.
pub async fn handle_translate_recipe(
    client: &dyn AiClient,
    recipe: &Recipe,
    language: &str,
) -> Result<TranslatedRecipe, ActionError> {
    if recipe.name.trim().is_empty() || recipe.instructions.trim().is_empty() {
        return Err(InputError::InvalidRecipe("translation").into());
    }

    let translation = ai::translate_recipe(client, recipe, language)
        .await
        .inspect_err(|e| {
            tracing::error!(recipe = %recipe.name, error = %e, "Recipe translation failed")
        })?;
    Ok(translation)
}

/// Generate an image for the named dish.
pub async fn handle_generate_image(
    client: &dyn AiClient,
    recipe_name: &str,
) -> Result<String, ActionError> {
    if recipe_name.trim().is_empty() {
        return Err(InputError::InvalidRecipe("image generation").into());
    }

    let data_uri = ai::generate_recipe_image(client, recipe_name)
        .await
        .inspect_err(|e| {
            tracing::error!(recipe = recipe_name, error = %e, "Image generation failed")
        })?;
    Ok(data_uri)
}

/// Apply a free-text modification request to a recipe.
pub async fn handle_improve_recipe(
    client: &dyn AiClient,
    recipe: &str,
    modification_request: &str,
) -> Result<String, ActionError> {
    if recipe.trim().is_empty() {
        return Err(InputError::InvalidRecipe("improvement").into());
    }
    if modification_request.trim().is_empty() {
        return Err(InputError::EmptyModification.into());
    }

    let improved = ai::improve_recipe(client, recipe, modification_request.trim())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Recipe improvement failed"))?;
    Ok(improved)
}

/// Plain-text rendering of a recipe, as sent to the improve flow.
pub fn recipe_to_text(recipe: &Recipe) -> String {
    let mut text = format!("{}\n\nIngredients:\n", recipe.name);
    for ingredient in &recipe.ingredients {
        text.push_str("- ");
        text.push_str(ingredient);
        text.push('\n');
    }
    text.push_str("\nInstructions:\n");
    text.push_str(&recipe.instructions);
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FakeAiClient;

    #[test]
    fn test_validate_ingredients_bounds() {
        assert_eq!(
            validate_ingredients("ab"),
            Err(InputError::TooShort { min: 3 })
        );
        assert_eq!(validate_ingredients("   ab   "), Err(InputError::TooShort { min: 3 }));
        assert_eq!(validate_ingredients("  egg "), Ok("egg"));
        assert!(validate_ingredients(&"a".repeat(500)).is_ok());
        assert_eq!(
            validate_ingredients(&"a".repeat(501)),
            Err(InputError::TooLong { max: 500 })
        );
    }

    #[test]
    fn test_validate_counts_characters_not_bytes() {
        // three Devanagari characters, nine bytes
        assert!(validate_ingredients("आलू").is_ok());
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            InputError::TooShort { min: 3 }.to_string(),
            "Please enter at least 3 characters for ingredients."
        );
        assert_eq!(
            InputError::TooLong { max: 500 }.to_string(),
            "Ingredients list is too long, please keep it under 500 characters."
        );
    }

    #[tokio::test]
    async fn test_short_input_makes_no_model_call() {
        let client = FakeAiClient::default();
        let err = handle_generate_recipe(&client, "ab").await.unwrap_err();
        assert!(err.is_input_error());
        assert_eq!(client.chat_calls(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_is_not_input_error() {
        let client = FakeAiClient::new();
        let err = handle_generate_recipe(&client, "chicken, rice")
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::GenerationFailed(_)));
    }

    #[tokio::test]
    async fn test_translate_rejects_empty_recipe() {
        let client = FakeAiClient::default();
        let recipe = Recipe::new("", vec![], "");
        let err = handle_translate_recipe(&client, &recipe, "Hindi")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid recipe data provided for translation."
        );
        assert_eq!(client.chat_calls(), 0);
    }

    #[tokio::test]
    async fn test_improve_requires_request() {
        let client = FakeAiClient::default();
        let err = handle_improve_recipe(&client, "Dal", "  ")
            .await
            .unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_recipe_to_text() {
        let recipe = Recipe::new("Dal", vec!["lentils".into()], "Boil.");
        assert_eq!(
            recipe_to_text(&recipe),
            "Dal\n\nIngredients:\n- lentils\n\nInstructions:\nBoil."
        );
    }
}
