//! Generative analysis layer
//!
//! Calls an OpenAI-compatible chat-completions backend with a French
//! business-consultant prompt, then pushes the raw text through a strict
//! sanitize / extract / validate / normalize pipeline. The model's output
//! is never trusted: everything that reaches callers has passed the
//! contract in `marketlens_core::GenerativeAnalysis`.

pub mod backend;
pub mod client;
pub mod extract;
pub mod prompt;
pub mod retry;
pub mod sanitize;
pub mod validate;

pub use backend::{ChatBackend, ChatMessage, OpenAiBackend};
pub use client::GenerativeClient;
pub use prompt::PromptBuilder;
pub use retry::RetryPolicy;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty response from backend")]
    EmptyResponse,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LlmError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::Network(_) | LlmError::EmptyResponse)
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Network(format!("request timed out: {err}"))
        } else if err.is_connect() {
            LlmError::Network(format!("connection failed: {err}"))
        } else {
            LlmError::Api(err.to_string())
        }
    }
}
