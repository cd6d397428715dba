//! Wire types for the chat completions API.

use serde::{Deserialize, Serialize};

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: "llama-3.1-70b-versatile".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            top_p: 0.95,
        }
    }
}

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Request body for a streamed chat completion.
///
/// `stop` is serialized as an explicit `null`: no early-stop sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub stream: bool,
    pub stop: Option<Vec<String>>,
}

impl ChatCompletionRequest {
    /// A streamed request carrying `prompt` as the single user message.
    pub fn streaming(params: &GenerationParams, prompt: impl Into<String>) -> Self {
        Self {
            model: params.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            stream: true,
            stop: None,
        }
    }
}

/// One `data:` payload of the completion stream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: Delta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Delta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// Text carried by the first choice, empty when the delta has none.
    ///
    /// `None` for chunks without choices (usage-only trailers).
    pub fn fragment(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|choice| choice.delta.content.as_deref().unwrap_or(""))
    }
}

/// Error envelope returned in a non-success body or inside the stream.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}

impl ErrorDetail {
    pub(crate) fn describe(&self) -> String {
        match &self.error_type {
            Some(kind) => format!("{} ({})", self.message, kind),
            None => self.message.clone(),
        }
    }
}
