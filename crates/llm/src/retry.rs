//! Bounded retry with linear backoff
//!
//! The policy lives outside the backend so the retry behavior can be
//! tested without a network. Only transient failures are retried;
//! protocol-level rejections surface immediately.

use std::future::Future;
use std::time::Duration;

use crate::LlmError;

/// Retry budget and backoff schedule for completion calls
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_retries: u32,
}

impl RetryPolicy {
    /// `max_retries` is the number of additional attempts after the first
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Wait before attempt n (1-based): n seconds
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_secs(attempt as u64)
    }

    /// The same policy with the retry budget capped at `cap`
    ///
    /// Health probes run under `capped(1)` so a dead backend answers
    /// quickly instead of burning the full analysis budget.
    pub fn capped(&self, cap: u32) -> RetryPolicy {
        RetryPolicy::new(self.max_retries.min(cap))
    }

    /// Run `op` up to `1 + max_retries` times, sleeping between attempts
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = self.backoff(attempt);
                tracing::warn!(
                    attempt,
                    max_retries = self.max_retries,
                    ?backoff,
                    "completion failed, retrying"
                );
                tokio::time::sleep(backoff).await;
            }

            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => {
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Network("max retries exceeded".to_string())))
    }
}
