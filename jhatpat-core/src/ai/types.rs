//! AI request and response types.

use serde::{Deserialize, Serialize};

use super::client::AiError;

/// Accepts or rejects a model reply.
///
/// Caching clients run it before storing a reply, so a reply the recipe flow
/// cannot use is never served again from the cache.
pub type ReplyCheck = fn(&str) -> Result<(), AiError>;

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        let content = content.into();
        Self { role, content }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// One chat completion call.
///
/// Only `messages` identify the request for caching; the other fields tune
/// the call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Ask the model for a JSON object.
    #[serde(skip)]
    pub json_response: bool,
    #[serde(skip)]
    pub check: Option<ReplyCheck>,
}

impl ChatRequest {
    /// A JSON-mode request whose reply must pass `check`.
    pub fn json(messages: Vec<ChatMessage>, check: ReplyCheck) -> Self {
        Self {
            messages,
            json_response: true,
            check: Some(check),
            ..Default::default()
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Run the reply check, if any.
    pub fn check_reply(&self, content: &str) -> Result<(), AiError> {
        self.check.map_or(Ok(()), |check| check(content))
    }

    /// All message contents joined, for substring matching in tests and logs.
    pub fn full_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A model reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    pub usage: TokenUsage,
    /// Served from the disk cache rather than the model.
    #[serde(default)]
    pub cached: bool,
}

/// Request for a generated image.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRequest {
    pub prompt: String,
    /// e.g. "1024x1024"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// A generated image.
#[derive(Debug, Clone)]
pub struct ImageResponse {
    /// `data:image/...;base64,...`
    pub data_uri: String,
    pub cached: bool,
}
