use crate::api::{action_error_response, ErrorResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use jhatpat_core::{Notice, Recipe};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRecipesRequest {
    /// Free-text ingredient list, 3 to 500 characters.
    pub ingredients: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateRecipesResponse {
    pub recipes: Vec<Recipe>,
    pub notice: Notice,
}

/// Generate recipes from a list of ingredients
///
/// The generated recipes are recorded at the top of the history.
#[utoipa::path(
    post,
    path = "/api/recipes/generate",
    tag = "recipes",
    request_body = GenerateRecipesRequest,
    responses(
        (status = 200, description = "Generated recipes", body = GenerateRecipesResponse),
        (status = 422, description = "Invalid ingredients", body = ErrorResponse),
        (status = 503, description = "AI service unavailable", body = ErrorResponse)
    )
)]
pub async fn generate_recipes(
    State(session): State<AppState>,
    Json(request): Json<GenerateRecipesRequest>,
) -> impl IntoResponse {
    match session.submit(&request.ingredients).await {
        Ok(submission) => (
            StatusCode::OK,
            Json(GenerateRecipesResponse {
                recipes: submission.recipes,
                notice: submission.notice,
            }),
        )
            .into_response(),
        Err(e) => action_error_response(e),
    }
}
