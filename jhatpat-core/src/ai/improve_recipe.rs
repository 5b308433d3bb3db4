//! Free-form recipe modification ("make it vegan", "less spicy").

use serde::Deserialize;

use crate::ai::prompts::improve_recipe::{
    render_improve_recipe_system_prompt, render_improve_recipe_user_prompt,
    IMPROVE_RECIPE_PROMPT_NAME,
};
use crate::ai::{AiClient, AiError, ChatMessage, ChatRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImproveRecipeResponse {
    improved_recipe: String,
}

/// Apply `modification_request` to a recipe given as text.
pub async fn improve_recipe(
    ai_client: &dyn AiClient,
    recipe: &str,
    modification_request: &str,
) -> Result<String, AiError> {
    let messages = vec![
        ChatMessage::system(render_improve_recipe_system_prompt()),
        ChatMessage::user(render_improve_recipe_user_prompt(recipe, modification_request)),
    ];
    let request = ChatRequest::json(messages, check_improved_recipe)
        .with_max_tokens(2048)
        .with_temperature(0.5);

    let response = ai_client
        .complete(IMPROVE_RECIPE_PROMPT_NAME, request)
        .await?;

    parse_improved_recipe(&response.content)
}

fn parse_improved_recipe(content: &str) -> Result<String, AiError> {
    let improved: ImproveRecipeResponse = serde_json::from_str(content)
        .map_err(|e| AiError::ParseError(format!("Failed to parse improve response: {}", e)))?;

    if improved.improved_recipe.trim().is_empty() {
        return Err(AiError::ParseError(
            "Improved recipe is empty".to_string(),
        ));
    }

    Ok(improved.improved_recipe)
}

fn check_improved_recipe(content: &str) -> Result<(), AiError> {
    parse_improved_recipe(content).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FakeAiClient;

    #[tokio::test]
    async fn test_improve() {
        let client = FakeAiClient::default();
        let improved = improve_recipe(&client, "Ginger Chicken Rice", "less spicy")
            .await
            .unwrap();
        assert!(improved.contains("less spicy"));
    }

    #[tokio::test]
    async fn test_empty_result_fails() {
        let client = FakeAiClient::with_response("modifying recipes", r#"{"improvedRecipe": ""}"#);
        assert!(improve_recipe(&client, "Dal", "more garlic").await.is_err());
    }
}
