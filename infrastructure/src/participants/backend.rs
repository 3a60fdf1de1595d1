//! Chat completion backends.
//!
//! A [`ChatBackend`] turns a system prompt and a user prompt into reply
//! text. HTTP status codes and transport errors are classified here into
//! transient and permanent [`CapabilityError`]s; retrying is left to the
//! round controller.

use agora_application::CapabilityError;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

/// Sampling options for one completion call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatOptions {
    /// Free-form debate arguments
    pub fn argument() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
        }
    }

    /// JSON rankings; lower temperature for more consistent JSON
    pub fn voting() -> Self {
        Self {
            max_tokens: 300,
            temperature: 0.3,
        }
    }

    pub fn judging() -> Self {
        Self {
            max_tokens: 800,
            temperature: 0.3,
        }
    }

    /// Apply per-participant overrides from configuration.
    pub fn with_overrides(mut self, max_tokens: Option<u32>, temperature: Option<f32>) -> Self {
        if let Some(max_tokens) = max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(temperature) = temperature {
            self.temperature = temperature;
        }
        self
    }
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Short label for logs, e.g. `openai:gpt-4o`
    fn describe(&self) -> String;

    async fn complete(
        &self,
        system: &str,
        user: &str,
        options: ChatOptions,
    ) -> Result<String, CapabilityError>;
}

/// Build the shared HTTP client for a backend.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, CapabilityError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CapabilityError::Permanent(format!("failed to create HTTP client: {}", e)))
}

/// Rate limits, request timeouts and server errors are worth retrying.
pub(crate) fn classify_status(status: StatusCode, body: &str) -> CapabilityError {
    let message = format!("HTTP {}: {}", status, agora_domain::util::preview(body, 200));
    if status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
    {
        CapabilityError::Transient(message)
    } else {
        CapabilityError::Permanent(message)
    }
}

pub(crate) fn classify_transport(error: reqwest::Error) -> CapabilityError {
    if error.is_builder() {
        CapabilityError::Permanent(format!("invalid request: {}", error))
    } else {
        CapabilityError::Transient(format!("request failed: {}", error))
    }
}

/// Reject empty replies as transient so the call is retried.
pub(crate) fn non_empty(text: String, backend: &str) -> Result<String, CapabilityError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(CapabilityError::Transient(format!("{} returned an empty reply", backend)))
    } else {
        Ok(trimmed.to_string())
    }
}
