use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use jhatpat_core::Recipe;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryParams {
    /// Case-insensitive substring of a recipe name or ingredient.
    /// Omit or leave empty to list everything.
    pub q: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    /// Newest first.
    pub recipes: Vec<Recipe>,
}

/// List or search the recipe history
#[utoipa::path(
    get,
    path = "/api/history",
    tag = "history",
    params(HistoryParams),
    responses(
        (status = 200, description = "Matching history entries", body = HistoryResponse)
    )
)]
pub async fn list_history(
    State(session): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> impl IntoResponse {
    let recipes = session.search(params.q.as_deref().unwrap_or(""));
    (StatusCode::OK, Json(HistoryResponse { recipes }))
}
