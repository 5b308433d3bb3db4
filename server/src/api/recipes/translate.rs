use crate::api::{action_error_response, ErrorResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use jhatpat_core::{handle_translate_recipe, Recipe, TranslatedRecipe};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TranslateRecipeRequest {
    pub recipe: Recipe,
    /// Target language. Defaults to the server's configured language.
    #[serde(default)]
    pub language: Option<String>,
}

/// Translate a recipe
///
/// Stateless: the history is not modified. Use `/api/history/select` to
/// translate and store in one step.
#[utoipa::path(
    post,
    path = "/api/recipes/translate",
    tag = "recipes",
    request_body = TranslateRecipeRequest,
    responses(
        (status = 200, description = "Translated recipe", body = TranslatedRecipe),
        (status = 422, description = "Invalid recipe", body = ErrorResponse),
        (status = 503, description = "AI service unavailable", body = ErrorResponse)
    )
)]
pub async fn translate_recipe(
    State(session): State<AppState>,
    Json(request): Json<TranslateRecipeRequest>,
) -> impl IntoResponse {
    let language = request
        .language
        .as_deref()
        .unwrap_or_else(|| session.language());

    match handle_translate_recipe(session.client(), &request.recipe, language).await {
        Ok(translation) => (StatusCode::OK, Json(translation)).into_response(),
        Err(e) => action_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{json_body, state};
    use jhatpat_core::ai::FakeAiClient;

    #[tokio::test]
    async fn test_translates_to_configured_language() {
        let response = translate_recipe(
            State(state(FakeAiClient::default())),
            Json(TranslateRecipeRequest {
                recipe: Recipe::new("Ginger Chicken Rice", vec![], "Wash the rice."),
                language: None,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["language"], "Hindi");
    }

    #[tokio::test]
    async fn test_empty_recipe_is_422() {
        let response = translate_recipe(
            State(state(FakeAiClient::default())),
            Json(TranslateRecipeRequest {
                recipe: Recipe::new("", vec![], ""),
                language: None,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["field"], "recipe");
    }
}
