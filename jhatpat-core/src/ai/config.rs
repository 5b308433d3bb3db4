//! AI configuration from environment variables.

use std::env;
use thiserror::Error;

/// Default OpenRouter base URL.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model to use.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Default model for recipe images.
pub const DEFAULT_IMAGE_MODEL: &str = "google/gemini-2.5-flash-image-preview";

/// Default rate limit between requests in milliseconds.
pub const DEFAULT_RATE_LIMIT_MS: u64 = 500;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Which AI backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    /// OpenAI-compatible API (OpenRouter by default).
    OpenRouter,
    /// Canned responses, no network.
    Fake,
}

impl AiProvider {
    /// Read `JHATPAT_AI_PROVIDER` ("openrouter" by default).
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var("JHATPAT_AI_PROVIDER") {
            Err(_) => Ok(AiProvider::OpenRouter),
            Ok(v) => match v.as_str() {
                "openrouter" | "openai" => Ok(AiProvider::OpenRouter),
                "fake" => Ok(AiProvider::Fake),
                _ => Err(ConfigError::InvalidValue {
                    name: "JHATPAT_AI_PROVIDER".to_string(),
                    value: v,
                }),
            },
        }
    }
}

/// AI client configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// API key for OpenRouter.
    pub api_key: String,
    /// Chat model name (e.g., "openai/gpt-4o-mini").
    pub model: String,
    /// Image model name.
    pub image_model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Directory for caching responses.
    pub cache_dir: std::path::PathBuf,
    /// If false, never read or write the response cache.
    pub cache_enabled: bool,
    /// If true, only use cache, error if not cached.
    pub offline: bool,
    /// Milliseconds to wait between requests.
    pub rate_limit_ms: u64,
}

impl AiConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `OPENROUTER_API_KEY`: API key for OpenRouter
    ///
    /// Optional:
    /// - `JHATPAT_AI_MODEL`: Model name (default: "openai/gpt-4o-mini")
    /// - `JHATPAT_AI_IMAGE_MODEL`: Image model name
    /// - `JHATPAT_AI_BASE_URL`: API base URL (default: "https://openrouter.ai/api/v1")
    /// - `JHATPAT_AI_CACHE_DIR`: Cache directory (default: "~/.jhatpat/ai-cache")
    /// - `JHATPAT_AI_CACHE`: Set to "false" to disable the cache
    /// - `JHATPAT_AI_OFFLINE`: Use cache only (default: false)
    /// - `JHATPAT_AI_RATE_LIMIT_MS`: Rate limit in ms (default: 500)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("OPENROUTER_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENROUTER_API_KEY".to_string()))?;

        let model = env::var("JHATPAT_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let image_model = env::var("JHATPAT_AI_IMAGE_MODEL")
            .unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string());

        let base_url =
            env::var("JHATPAT_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let cache_dir = Self::cache_dir_from_env();

        let cache_enabled = env::var("JHATPAT_AI_CACHE")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let offline = env::var("JHATPAT_AI_OFFLINE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let rate_limit_ms = env::var("JHATPAT_AI_RATE_LIMIT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RATE_LIMIT_MS);

        Ok(Self {
            api_key,
            model,
            image_model,
            base_url,
            cache_dir,
            cache_enabled,
            offline,
            rate_limit_ms,
        })
    }

    /// `JHATPAT_AI_CACHE_DIR`, or the default. Needs no API key.
    pub fn cache_dir_from_env() -> std::path::PathBuf {
        env::var("JHATPAT_AI_CACHE_DIR")
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|_| Self::default_cache_dir())
    }

    /// Get the default cache directory: ~/.jhatpat/ai-cache
    pub fn default_cache_dir() -> std::path::PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".jhatpat").join("ai-cache"))
            .unwrap_or_else(|| std::path::PathBuf::from("data/ai-cache"))
    }
}
