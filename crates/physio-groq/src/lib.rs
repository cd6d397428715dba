//! Groq chat-completions integration for physio-assess.
//!
//! This crate submits a prompt to an OpenAI-compatible chat completions
//! endpoint with `stream: true` and exposes the reply as an ordered stream of
//! text fragments.

mod client;
mod error;
mod sse;
mod types;

pub use client::{CompletionService, FragmentStream, GroqClient, decode_fragments};
pub use error::GroqError;
pub use sse::{SseDecoder, SseEvent};
pub use types::{
    ChatCompletionChunk, ChatCompletionRequest, ChatMessage, ChatRole, GenerationParams,
};

pub const DEFAULT_API_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Connection settings for [`GroqClient`].
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key. When `None` it is read from `api_key_env`.
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Base URL of the OpenAI-compatible API, without `/chat/completions`.
    pub api_base_url: String,
    /// Timeout for establishing the connection. The streamed body has none.
    pub connect_timeout_secs: Option<u64>,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            connect_timeout_secs: None,
        }
    }
}

impl GroqConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = var.into();
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = Some(secs);
        self
    }

    /// Resolve the API key from the config or the environment.
    pub fn resolve_api_key(&self) -> Result<String, GroqError> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GroqError::MissingApiKey {
                env_var: self.api_key_env.clone(),
            })
    }
}
