pub mod list;
pub mod select;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/history endpoints (mounted at /api/history)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_history))
        .route("/select", post(select::select_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_history, select::select_recipe),
    components(schemas(
        list::HistoryResponse,
        select::SelectRecipeRequest,
        select::SelectRecipeResponse,
    ))
)]
pub struct ApiDoc;
