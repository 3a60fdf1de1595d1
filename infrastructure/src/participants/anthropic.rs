//! Anthropic messages API backend.

use super::backend::{
    ChatBackend, ChatOptions, classify_status, classify_transport, http_client, non_empty,
};
use agora_application::CapabilityError;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

pub struct AnthropicBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    api_version: String,
    model: String,
}

impl AnthropicBackend {
    pub fn new(
        base_url: &str,
        api_key: String,
        api_version: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, CapabilityError> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            api_version,
            model,
        })
    }

    fn payload(&self, system: &str, user: &str, options: ChatOptions) -> Value {
        json!({
            "model": self.model,
            "max_tokens": options.max_tokens,
            "temperature": options.temperature,
            "system": system,
            "messages": [{"role": "user", "content": user}],
        })
    }
}

/// Concatenated text blocks of a messages API reply.
pub(crate) fn extract_text(body: &Value) -> Option<String> {
    let blocks = body.get("content")?.as_array()?;
    let text: Vec<&str> = blocks
        .iter()
        .filter(|b| b.get("type").and_then(Value::as_str).unwrap_or("text") == "text")
        .filter_map(|b| b.get("text").and_then(Value::as_str))
        .collect();
    (!text.is_empty()).then(|| text.join(""))
}

#[async_trait]
impl ChatBackend for AnthropicBackend {
    fn describe(&self) -> String {
        format!("anthropic:{}", self.model)
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
        options: ChatOptions,
    ) -> Result<String, CapabilityError> {
        let url = format!("{}/v1/messages", self.base_url);
        debug!("POST {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&self.payload(system, user, options))
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let body: Value = response.json().await.map_err(|e| {
            CapabilityError::Transient(format!("unreadable reply from {}: {}", self.describe(), e))
        })?;
        let text = extract_text(&body).ok_or_else(|| {
            CapabilityError::Transient(format!("no text content in reply from {}", self.describe()))
        })?;
        non_empty(text, &self.describe())
    }
}
