use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use jhatpat_core::{Notice, Recipe};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectRecipeRequest {
    pub recipe: Recipe,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SelectRecipeResponse {
    /// The recipe with whatever enrichment succeeded.
    pub recipe: Recipe,
    pub notices: Vec<Notice>,
}

/// Select a recipe and enrich it with an image and a translation
///
/// Enrichment failures are reported as notices; the request itself still
/// succeeds. The matching history entry is updated in place.
#[utoipa::path(
    post,
    path = "/api/history/select",
    tag = "history",
    request_body = SelectRecipeRequest,
    responses(
        (status = 200, description = "Enriched recipe and notices", body = SelectRecipeResponse)
    )
)]
pub async fn select_recipe(
    State(session): State<AppState>,
    Json(request): Json<SelectRecipeRequest>,
) -> impl IntoResponse {
    let selection = session.select(request.recipe).await;
    (
        StatusCode::OK,
        Json(SelectRecipeResponse {
            recipe: selection.recipe,
            notices: selection.notices,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{json_body, state};
    use jhatpat_core::ai::FakeAiClient;

    #[tokio::test]
    async fn test_image_failure_is_still_200() {
        let state = state(FakeAiClient::default().without_image());
        let recipe = Recipe::new("Dal", vec![], "Boil the lentils.");
        state.history().add_or_promote(recipe.clone());

        let response = select_recipe(State(state.clone()), Json(SelectRecipeRequest { recipe }))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["recipe"].get("imageUri").is_none());
        assert!(body["notices"]
            .as_array()
            .unwrap()
            .iter()
            .any(|n| n["level"] == "error"));
        assert!(state.history().get(0).unwrap().translation.is_some());
    }
}
