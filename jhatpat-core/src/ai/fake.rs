//! Fake AI client for testing and offline demos.
//!
//! This client returns deterministic responses based on prompt matching,
//! allowing tests to run without network access or API costs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::client::{AiClient, AiError};
use super::types::{ChatRequest, ChatResponse, ImageRequest, ImageResponse, TokenUsage};

/// 1x1 transparent PNG.
pub const FAKE_IMAGE_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// A fake AI client.
///
/// Chat responses are matched by checking if the prompt contains a registered
/// substring (case-insensitive, first registered match wins). If nothing
/// matches, the default response is returned, or an error when there is none.
#[derive(Debug)]
pub struct FakeAiClient {
    /// (prompt substring, response) in registration order
    responses: RwLock<Vec<(String, String)>>,
    default_response: Option<String>,
    image: Option<String>,
    chat_calls: AtomicUsize,
    image_calls: AtomicUsize,
}

impl Default for FakeAiClient {
    /// Canned responses for every recipe flow.
    fn default() -> Self {
        let mut client = Self::new().with_image(FAKE_IMAGE_DATA_URI);
        client.add_response(
            "expert translator",
            r#"{"recipeName": "अदरक चिकन चावल", "ingredients": ["चिकन", "चावल", "अदरक"], "instructions": "चावल धोएं।\nचिकन पकाएं।"}"#,
        );
        client.add_response(
            "modifying recipes",
            r#"{"improvedRecipe": "Ginger Chicken Rice (less spicy)\n\nUse half the chillies."}"#,
        );
        client.add_response(
            "creative recipe generator",
            r#"{"recipes": [{"recipeName": "Ginger Chicken Rice", "ingredients": ["chicken", "rice", "ginger"], "instructions": "Wash the rice.\nCook the chicken with ginger.\nCombine and steam."}]}"#,
        );
        client
    }
}

impl FakeAiClient {
    /// Create a new FakeAiClient with no registered responses and no image.
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(Vec::new()),
            default_response: None,
            image: None,
            chat_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
        }
    }

    /// Create a FakeAiClient that returns a specific response for prompts containing a substring.
    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let mut client = Self::new();
        client.add_response(prompt_contains, response);
        client
    }

    /// Add a response for prompts containing a specific substring.
    pub fn add_response(&mut self, prompt_contains: &str, response: &str) {
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((prompt_contains.to_lowercase(), response.to_string()));
    }

    /// Set the default response when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Return `data_uri` for every image request.
    pub fn with_image(mut self, data_uri: &str) -> Self {
        self.image = Some(data_uri.to_string());
        self
    }

    /// Fail every image request.
    pub fn without_image(mut self) -> Self {
        self.image = None;
        self
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AiClient for FakeAiClient {
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        let prompt = request.full_text().to_lowercase();

        let matched = self
            .responses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(pattern, _)| prompt.contains(pattern.as_str()))
            .map(|(_, response)| response.clone());

        match matched.or_else(|| self.default_response.clone()) {
            Some(content) => Ok(ChatResponse {
                content,
                usage: TokenUsage::default(),
                cached: false,
            }),
            None => Err(AiError::Api(format!(
                "FakeAiClient: No response configured for prompt {}",
                prompt_name
            ))),
        }
    }

    async fn generate_image(
        &self,
        prompt_name: &str,
        _request: ImageRequest,
    ) -> Result<ImageResponse, AiError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        match &self.image {
            Some(data_uri) => Ok(ImageResponse {
                data_uri: data_uri.clone(),
                cached: false,
            }),
            None => Err(AiError::Api(format!(
                "FakeAiClient: image generation unavailable for {}",
                prompt_name
            ))),
        }
    }
}
