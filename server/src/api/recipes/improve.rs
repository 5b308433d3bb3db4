use crate::api::{action_error_response, ErrorResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use jhatpat_core::handle_improve_recipe;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImproveRecipeRequest {
    /// The recipe as plain text.
    pub recipe: String,
    /// What to change, e.g. "make it vegan".
    pub modification_request: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImproveRecipeResponse {
    pub improved_recipe: String,
}

/// Modify a recipe according to a free-text request
#[utoipa::path(
    post,
    path = "/api/recipes/improve",
    tag = "recipes",
    request_body = ImproveRecipeRequest,
    responses(
        (status = 200, description = "Improved recipe", body = ImproveRecipeResponse),
        (status = 422, description = "Missing recipe or request", body = ErrorResponse),
        (status = 503, description = "AI service unavailable", body = ErrorResponse)
    )
)]
pub async fn improve_recipe(
    State(session): State<AppState>,
    Json(request): Json<ImproveRecipeRequest>,
) -> impl IntoResponse {
    match handle_improve_recipe(
        session.client(),
        &request.recipe,
        &request.modification_request,
    )
    .await
    {
        Ok(improved_recipe) => {
            (StatusCode::OK, Json(ImproveRecipeResponse { improved_recipe })).into_response()
        }
        Err(e) => action_error_response(e),
    }
}
