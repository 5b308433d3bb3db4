pub mod history;
pub mod recipes;
pub mod testing;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jhatpat_core::{ActionError, InputError};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Request field the error refers to, for inline display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            field: None,
        }
    }
}

/// Map an action failure onto a status and JSON body.
///
/// Input errors are 422 and name the offending field; everything else means
/// the AI service could not produce a result.
pub fn action_error_response(err: ActionError) -> Response {
    match err {
        ActionError::InvalidInput(input) => {
            let field = match input {
                InputError::TooShort { .. } | InputError::TooLong { .. } => "ingredients",
                InputError::InvalidRecipe(_) => "recipe",
                InputError::EmptyModification => "modificationRequest",
            };
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    error: input.to_string(),
                    field: Some(field.to_string()),
                }),
            )
                .into_response()
        }
        ActionError::GenerationFailed(message) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new(message)),
        )
            .into_response(),
    }
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Jhatpat Recipes API"),
        components(schemas(
            ErrorResponse,
            jhatpat_core::Recipe,
            jhatpat_core::TranslatedRecipe,
            jhatpat_core::Notice,
            jhatpat_core::NoticeLevel,
        ))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        testing::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        history::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
