//! AI client module for LLM integration via OpenRouter.
//!
//! This module provides:
//! - `AiClient` trait for abstracting AI providers
//! - `CachingAiClient` implementation with disk-based caching
//! - `FakeAiClient` with canned responses for tests and offline demos
//! - The recipe flows: generate, translate, illustrate, improve
//!
//! # Configuration
//!
//! Set these environment variables:
//!
//! - `JHATPAT_AI_PROVIDER` (optional): "openrouter" (default) or "fake"
//! - `OPENROUTER_API_KEY` (required for openrouter): Your OpenRouter API key
//! - `JHATPAT_AI_MODEL` (optional): Model name, e.g., "openai/gpt-4o-mini"
//! - `JHATPAT_AI_IMAGE_MODEL` (optional): Image model name
//! - `JHATPAT_AI_BASE_URL` (optional): API base URL
//! - `JHATPAT_AI_CACHE_DIR` (optional): Cache directory path
//! - `JHATPAT_AI_OFFLINE` (optional): Set to "true" to use cache only
//! - `JHATPAT_AI_RATE_LIMIT_MS` (optional): Delay between requests in ms
//!
//! # Example
//!
//! ```ignore
//! use jhatpat_core::ai::{create_client_from_env, generate_recipes};
//!
//! let client = create_client_from_env()?;
//! let result = generate_recipes(client.as_ref(), "chicken, rice, ginger").await?;
//! println!("{}", result.recipes[0].name);
//! ```

mod cache;
mod client;
mod config;
mod fake;
mod generate_recipe;
mod improve_recipe;
pub mod prompts;
mod recipe_image;
mod translate_recipe;
mod types;

use std::sync::Arc;

pub use cache::{AiCache, CacheEntry, CacheKey, CacheStats};
pub use client::{AiClient, AiError, CachingAiClient};
pub use config::{AiConfig, AiProvider, ConfigError};
pub use fake::{FakeAiClient, FAKE_IMAGE_DATA_URI};
pub use generate_recipe::{generate_recipes, GenerateRecipeResult};
pub use improve_recipe::improve_recipe;
pub use recipe_image::generate_recipe_image;
pub use translate_recipe::translate_recipe;
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, ImageRequest, ImageResponse, ReplyCheck, Role,
    TokenUsage,
};

/// Build the client selected by `JHATPAT_AI_PROVIDER`.
pub fn create_client_from_env() -> Result<Arc<dyn AiClient>, AiError> {
    match AiProvider::from_env()? {
        AiProvider::OpenRouter => {
            let client = CachingAiClient::from_env()?;
            Ok(Arc::new(client))
        }
        AiProvider::Fake => {
            tracing::info!("Using fake AI provider");
            Ok(Arc::new(FakeAiClient::default()))
        }
    }
}
