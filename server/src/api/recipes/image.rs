use crate::api::{action_error_response, ErrorResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use jhatpat_core::handle_generate_image;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateImageRequest {
    /// Name of the dish to illustrate.
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    /// `data:image/...;base64,...`
    pub image_uri: String,
}

/// Generate an image for a dish
#[utoipa::path(
    post,
    path = "/api/recipes/image",
    tag = "recipes",
    request_body = GenerateImageRequest,
    responses(
        (status = 200, description = "Generated image", body = GenerateImageResponse),
        (status = 422, description = "Missing dish name", body = ErrorResponse),
        (status = 503, description = "AI service unavailable", body = ErrorResponse)
    )
)]
pub async fn generate_image(
    State(session): State<AppState>,
    Json(request): Json<GenerateImageRequest>,
) -> impl IntoResponse {
    match handle_generate_image(session.client(), &request.name).await {
        Ok(image_uri) => (StatusCode::OK, Json(GenerateImageResponse { image_uri })).into_response(),
        Err(e) => action_error_response(e),
    }
}
