pub mod generate;
pub mod image;
pub mod improve;
pub mod translate;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate::generate_recipes))
        .route("/translate", post(translate::translate_recipe))
        .route("/image", post(image::generate_image))
        .route("/improve", post(improve::improve_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        generate::generate_recipes,
        translate::translate_recipe,
        image::generate_image,
        improve::improve_recipe,
    ),
    components(schemas(
        generate::GenerateRecipesRequest,
        generate::GenerateRecipesResponse,
        translate::TranslateRecipeRequest,
        image::GenerateImageRequest,
        image::GenerateImageResponse,
        improve::ImproveRecipeRequest,
        improve::ImproveRecipeResponse,
    ))
)]
pub struct ApiDoc;
