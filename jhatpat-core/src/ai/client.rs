//! AI client implementation using OpenRouter (OpenAI-compatible API).

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::Instrument;

use super::cache::{AiCache, CacheEntry, CacheKey};
use super::config::AiConfig;
use super::types::{
    ChatMessage, ChatRequest, ChatResponse, ImageRequest, ImageResponse, Role, TokenUsage,
};
use crate::image::validate_data_uri;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("API error: {0}")]
    Api(String),

    #[error("API returned error: {status} - {message}")]
    ApiStatus { status: u16, message: String },

    #[error("Response not in cache and offline mode is enabled")]
    OfflineNotCached,

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

/// Trait for AI clients.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Complete a chat request.
    ///
    /// The `prompt_name` is used for cache organization. Cache invalidation happens
    /// automatically based on the content hash of the messages.
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError>;

    /// Generate an image and return it as a data URI.
    async fn generate_image(
        &self,
        prompt_name: &str,
        request: ImageRequest,
    ) -> Result<ImageResponse, AiError>;
}

/// AI client with caching and rate limiting, using OpenRouter.
pub struct CachingAiClient {
    client: Client<OpenAIConfig>,
    http: reqwest::Client,
    cache: AiCache,
    config: AiConfig,
    last_request: Arc<Mutex<Option<Instant>>>,
}

/// Chat request asking for image output.
#[derive(Debug, Serialize)]
struct ImageChatRequest<'a> {
    model: &'a str,
    messages: [ImageChatMessage<'a>; 1],
    modalities: [&'static str; 2],
}

#[derive(Debug, Serialize)]
struct ImageChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageChatResponse {
    choices: Vec<ImageChoice>,
}

#[derive(Debug, Deserialize)]
struct ImageChoice {
    message: ImageChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ImageChoiceMessage {
    #[serde(default)]
    images: Vec<ImagePart>,
}

#[derive(Debug, Deserialize)]
struct ImagePart {
    image_url: ImageUrl,
}

#[derive(Debug, Deserialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorMessage {
    message: String,
}

impl CachingAiClient {
    /// Create a new client from environment configuration.
    pub fn from_env() -> Result<Self, AiError> {
        let config = AiConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// Create a new client with the given configuration.
    pub fn new(config: AiConfig) -> Self {
        // Configure async-openai to use OpenRouter
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(&config.base_url);

        let client = Client::with_config(openai_config);
        let cache = AiCache::new(config.cache_dir.clone());

        Self {
            client,
            http: reqwest::Client::new(),
            cache,
            config,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn cache(&self) -> &AiCache {
        &self.cache
    }

    /// Apply rate limiting between requests.
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            let min_interval = Duration::from_millis(self.config.rate_limit_ms);

            if elapsed < min_interval {
                tokio::time::sleep(min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }

    fn cached(&self, key: &CacheKey) -> Option<ChatResponse> {
        if !self.config.cache_enabled {
            return None;
        }
        self.cache.get(key).map(CacheEntry::into_response)
    }

    /// Drop a cached reply that its flow can no longer use.
    fn evict(&self, key: &CacheKey, reason: &AiError) {
        tracing::warn!(
            prompt_name = %key.prompt_name,
            error = %reason,
            "Discarding unusable cached AI response"
        );
        if let Err(e) = self.cache.remove(key) {
            tracing::warn!("Failed to remove cached AI response: {}", e);
        }
    }

    fn store(&self, key: &CacheKey, response: &ChatResponse, model: &str) {
        if !self.config.cache_enabled {
            return;
        }
        if let Err(e) = self.cache.put(key, response, model) {
            tracing::warn!("Failed to cache AI response: {}", e);
        }
    }

    /// Convert our ChatMessage to async-openai's format.
    fn to_openai_message(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage, AiError> {
        match msg.role {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(msg.content.clone())
                .build()
                .map(Into::into)
                .map_err(|e| AiError::Api(format!("Failed to build system message: {}", e))),
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(msg.content.clone())
                .build()
                .map(Into::into)
                .map_err(|e| AiError::Api(format!("Failed to build user message: {}", e))),
            Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(msg.content.clone())
                .build()
                .map(Into::into)
                .map_err(|e| AiError::Api(format!("Failed to build assistant message: {}", e))),
        }
    }
}

#[async_trait]
impl AiClient for CachingAiClient {
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        let cache_key = CacheKey::new(prompt_name, &self.config.model, &request.messages);

        if let Some(cached) = self.cached(&cache_key) {
            match request.check_reply(&cached.content) {
                Ok(()) => {
                    tracing::debug!(prompt_name = prompt_name, "AI response found in cache");
                    return Ok(cached);
                }
                Err(e) => self.evict(&cache_key, &e),
            }
        }

        if self.config.offline {
            return Err(AiError::OfflineNotCached);
        }

        self.rate_limit().await;

        let messages: Vec<ChatCompletionRequestMessage> = request
            .messages
            .iter()
            .map(Self::to_openai_message)
            .collect::<Result<Vec<_>, _>>()?;

        let mut req_builder = CreateChatCompletionRequestArgs::default();
        req_builder.model(&self.config.model).messages(messages);

        if let Some(max_tokens) = request.max_tokens {
            req_builder.max_completion_tokens(max_tokens);
        }

        if let Some(temperature) = request.temperature {
            req_builder.temperature(temperature);
        }

        if request.json_response {
            req_builder.response_format(ResponseFormat::JsonObject);
        }

        let openai_request = req_builder
            .build()
            .map_err(|e| AiError::Api(e.to_string()))?;

        tracing::debug!(
            prompt_name = prompt_name,
            model = %self.config.model,
            "Calling AI API"
        );

        let response = self
            .client
            .chat()
            .create(openai_request)
            .instrument(tracing::info_span!(
                "ai.request",
                prompt_name = prompt_name,
                model = %self.config.model
            ))
            .await
            .map_err(|e| AiError::Api(e.to_string()))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| AiError::ParseError("Response contained no content".to_string()))?;

        let usage = response
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        // A reply the flow would reject fails this call only; it is not cached.
        request.check_reply(&content)?;

        let chat_response = ChatResponse {
            content,
            usage,
            cached: false,
        };

        self.store(&cache_key, &chat_response, &self.config.model);

        Ok(chat_response)
    }

    async fn generate_image(
        &self,
        prompt_name: &str,
        request: ImageRequest,
    ) -> Result<ImageResponse, AiError> {
        let cache_key = CacheKey::new(prompt_name, &self.config.image_model, &request);

        if let Some(cached) = self.cached(&cache_key) {
            match validate_data_uri(&cached.content) {
                Ok(_) => {
                    tracing::debug!(prompt_name = prompt_name, "AI image found in cache");
                    return Ok(ImageResponse {
                        data_uri: cached.content,
                        cached: true,
                    });
                }
                Err(e) => self.evict(&cache_key, &AiError::InvalidImage(e)),
            }
        }

        if self.config.offline {
            return Err(AiError::OfflineNotCached);
        }

        self.rate_limit().await;

        let body = ImageChatRequest {
            model: &self.config.image_model,
            messages: [ImageChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            modalities: ["image", "text"],
        };

        tracing::debug!(
            prompt_name = prompt_name,
            model = %self.config.image_model,
            "Calling AI image API"
        );

        let response = self
            .http
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .instrument(tracing::info_span!(
                "ai.request",
                prompt_name = prompt_name,
                model = %self.config.image_model
            ))
            .await
            .map_err(|e| AiError::Api(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AiError::Api(e.to_string()))?;

        if status != 200 {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            return Err(AiError::ApiStatus { status, message });
        }

        let parsed: ImageChatResponse =
            serde_json::from_str(&text).map_err(|e| AiError::ParseError(e.to_string()))?;

        let data_uri = parsed
            .choices
            .into_iter()
            .flat_map(|c| c.message.images)
            .map(|i| i.image_url.url)
            .next()
            .ok_or_else(|| {
                AiError::ParseError("Image generation failed to produce an image".to_string())
            })?;

        validate_data_uri(&data_uri).map_err(AiError::InvalidImage)?;

        self.store(
            &cache_key,
            &ChatResponse {
                content: data_uri.clone(),
                usage: TokenUsage::default(),
                cached: false,
            },
            &self.config.image_model,
        );

        Ok(ImageResponse {
            data_uri,
            cached: false,
        })
    }
}
