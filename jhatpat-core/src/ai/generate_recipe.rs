//! Recipe generation from a free-text ingredient list.

use serde::Deserialize;

use crate::ai::prompts::generate_recipe::{
    render_generate_recipe_prompt, GENERATE_RECIPE_PROMPT_NAME, MAX_RECIPES,
};
use crate::ai::{AiClient, AiError, ChatMessage, ChatRequest, TokenUsage};
use crate::staples::without_staples;
use crate::types::Recipe;

/// Response format from the AI.
#[derive(Debug, Deserialize)]
struct GenerateRecipeResponse {
    recipes: Vec<GeneratedRecipe>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedRecipe {
    recipe_name: Option<String>,
    #[serde(default)]
    ingredients: Vec<String>,
    instructions: Option<String>,
}

/// Result of recipe generation.
#[derive(Debug)]
pub struct GenerateRecipeResult {
    pub recipes: Vec<Recipe>,
    pub cached: bool,
    pub usage: TokenUsage,
}

/// Generate 1 to 3 recipes for the given ingredients.
///
/// Every returned recipe must carry a name and instructions. If any recipe in
/// the response is missing one, the whole call fails. Staples are stripped
/// from each ingredient list.
pub async fn generate_recipes(
    ai_client: &dyn AiClient,
    ingredients: &str,
) -> Result<GenerateRecipeResult, AiError> {
    let prompt = render_generate_recipe_prompt(ingredients);
    let request = ChatRequest::json(vec![ChatMessage::user(prompt)], check_generated_recipes)
        .with_max_tokens(2048)
        .with_temperature(0.8);

    let response = ai_client
        .complete(GENERATE_RECIPE_PROMPT_NAME, request)
        .await?;

    let recipes = parse_generated_recipes(&response.content)?;

    tracing::debug!(count = recipes.len(), "Generated recipes");

    Ok(GenerateRecipeResult {
        recipes,
        cached: response.cached,
        usage: response.usage,
    })
}

fn check_generated_recipes(content: &str) -> Result<(), AiError> {
    parse_generated_recipes(content).map(|_| ())
}

fn parse_generated_recipes(content: &str) -> Result<Vec<Recipe>, AiError> {
    let ai_response: GenerateRecipeResponse = serde_json::from_str(content).map_err(|e| {
        AiError::ParseError(format!("Failed to parse recipe generation response: {}", e))
    })?;

    if ai_response.recipes.is_empty() {
        return Err(AiError::ParseError(
            "Recipe generation returned no recipes".to_string(),
        ));
    }

    ai_response
        .recipes
        .into_iter()
        .take(MAX_RECIPES)
        .enumerate()
        .map(|(i, generated)| {
            let name = generated
                .recipe_name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .ok_or_else(|| {
                    AiError::ParseError(format!("Recipe {} is missing recipeName", i + 1))
                })?;
            let instructions = generated.instructions.ok_or_else(|| {
                AiError::ParseError(format!("Recipe {} is missing instructions", i + 1))
            })?;
            Ok(Recipe::new(
                name,
                without_staples(generated.ingredients),
                instructions,
            ))
        })
        .collect()
}
