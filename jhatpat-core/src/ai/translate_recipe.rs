//! Recipe translation into a second language.

use serde::Deserialize;

use crate::ai::prompts::translate_recipe::{
    render_translate_recipe_prompt, TRANSLATE_RECIPE_PROMPT_NAME,
};
use crate::ai::{AiClient, AiError, ChatMessage, ChatRequest};
use crate::types::{Recipe, TranslatedRecipe};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRecipeResponse {
    recipe_name: String,
    ingredients: Vec<String>,
    instructions: String,
}

/// Translate a recipe's name, ingredients and instructions into `language`.
///
/// All three fields are required in the response. The image is not part of
/// the translation.
pub async fn translate_recipe(
    ai_client: &dyn AiClient,
    recipe: &Recipe,
    language: &str,
) -> Result<TranslatedRecipe, AiError> {
    let prompt = render_translate_recipe_prompt(
        language,
        &recipe.name,
        &recipe.ingredients,
        &recipe.instructions,
    );
    let request = ChatRequest::json(vec![ChatMessage::user(prompt)], check_translation)
        .with_max_tokens(2048)
        .with_temperature(0.2);

    let response = ai_client
        .complete(TRANSLATE_RECIPE_PROMPT_NAME, request)
        .await?;

    let translated = parse_translation(&response.content)?;

    Ok(TranslatedRecipe {
        language: language.to_string(),
        name: translated.recipe_name,
        ingredients: translated.ingredients,
        instructions: translated.instructions,
    })
}

fn parse_translation(content: &str) -> Result<TranslateRecipeResponse, AiError> {
    let translated: TranslateRecipeResponse = serde_json::from_str(content)
        .map_err(|e| AiError::ParseError(format!("Failed to parse translation response: {}", e)))?;

    if translated.recipe_name.trim().is_empty() {
        return Err(AiError::ParseError(
            "Translation is missing recipeName".to_string(),
        ));
    }

    Ok(translated)
}

fn check_translation(content: &str) -> Result<(), AiError> {
    parse_translation(content).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FakeAiClient;

    fn recipe() -> Recipe {
        Recipe::new("Ginger Chicken Rice", vec!["chicken".into()], "Wash the rice.")
    }

    #[tokio::test]
    async fn test_translate() {
        let client = FakeAiClient::default();
        let translated = translate_recipe(&client, &recipe(), "Hindi").await.unwrap();
        assert_eq!(translated.language, "Hindi");
        assert_eq!(translated.name, "अदरक चिकन चावल");
        assert_eq!(translated.ingredients.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_field_fails() {
        let client = FakeAiClient::with_response(
            "expert translator",
            r#"{"recipeName": "अदरक", "instructions": "पकाएं"}"#,
        );
        let result = translate_recipe(&client, &recipe(), "Hindi").await;
        assert!(matches!(result, Err(AiError::ParseError(_))));
    }
}
