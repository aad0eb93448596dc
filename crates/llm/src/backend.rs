//! Chat-completion backend
//!
//! OpenAI-compatible `/v1/chat/completions` client with linear-backoff
//! retries. Local runtimes (LM Studio, vLLM and friends) expose the same
//! wire format, so one backend covers them all.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use marketlens_config::GenerativeSettings;

use crate::retry::RetryPolicy;
use crate::LlmError;

/// One chat message on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat backend trait
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Run one non-streaming completion, returning the trimmed content
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;

    /// Like `complete`, but with a minimal retry budget for health probes
    async fn probe(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.complete(messages).await
    }

    /// Check if the backend answers at all
    async fn is_available(&self) -> bool;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// OpenAI-compatible backend
#[derive(Clone)]
pub struct OpenAiBackend {
    client: Client,
    settings: GenerativeSettings,
    retries: RetryPolicy,
}

impl OpenAiBackend {
    pub fn new(settings: GenerativeSettings) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        let retries = RetryPolicy::new(settings.max_retries);
        Ok(Self {
            client,
            settings,
            retries,
        })
    }

    async fn execute_request(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let response = self
            .client
            .post(self.settings.chat_url())
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            // 5xx errors are retryable, 4xx are not
            if status.is_server_error() {
                return Err(LlmError::Network(format!("Server error {status}: {error}")));
            }
            return Err(LlmError::Api(format!("HTTP {status}: {error}")));
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let content = data
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        let content = content.trim();
        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(content.to_string())
    }

    fn request_for(&self, messages: &[ChatMessage]) -> ChatRequest {
        ChatRequest {
            model: self.settings.model.clone(),
            messages: messages.to_vec(),
            temperature: self.settings.temperature,
            top_p: self.settings.top_p,
            max_tokens: self.settings.max_tokens,
            stream: false,
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    /// Run one completion under the retry policy
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let request = self.request_for(messages);
        self.retries.run(|| self.execute_request(&request)).await
    }

    /// Same call with at most one retry, so a dead backend fails fast
    async fn probe(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let request = self.request_for(messages);
        self.retries
            .capped(1)
            .run(|| self.execute_request(&request))
            .await
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(self.settings.models_url())
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn model_name(&self) -> &str {
        &self.settings.model
    }
}

// OpenAI-compatible API types
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
