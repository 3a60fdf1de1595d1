//! Chat-completions backend for OpenAI and compatible local servers.

use super::backend::{
    ChatBackend, ChatOptions, classify_status, classify_transport, http_client, non_empty,
};
use agora_application::CapabilityError;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

/// `POST {base_url}{endpoint}` with a chat-completions payload.
pub struct OpenAiCompatibleBackend {
    client: reqwest::Client,
    url: String,
    model: Option<String>,
    bearer_token: Option<String>,
    label: String,
}

impl OpenAiCompatibleBackend {
    pub fn new(base_url: &str, endpoint: &str, timeout: Duration) -> Result<Self, CapabilityError> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), endpoint);
        Ok(Self {
            client: http_client(timeout)?,
            label: url.clone(),
            url,
            model: None,
            bearer_token: None,
        })
    }

    /// Hosted OpenAI API
    pub fn openai(
        base_url: &str,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, CapabilityError> {
        Ok(Self::new(base_url, "/v1/chat/completions", timeout)?
            .with_bearer_token(api_key)
            .with_model(model))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        self.label = format!("openai:{}", model);
        self.model = Some(model);
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn payload(&self, system: &str, user: &str, options: ChatOptions) -> Value {
        let mut payload = json!({
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ],
            "max_tokens": options.max_tokens,
            "temperature": options.temperature,
        });
        if let Some(model) = &self.model {
            payload["model"] = json!(model);
        }
        payload
    }
}

/// Reply text from a chat-completions or simple `{"response": ...}` body.
pub(crate) fn extract_content(body: &Value) -> Option<String> {
    body.pointer("/choices/0/message/content")
        .or_else(|| body.get("response"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl ChatBackend for OpenAiCompatibleBackend {
    fn describe(&self) -> String {
        self.label.clone()
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
        options: ChatOptions,
    ) -> Result<String, CapabilityError> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&self.payload(system, user, options));
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        debug!("POST {} ({} prompt bytes)", self.url, system.len() + user.len());
        let response = request.send().await.map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let body: Value = response.json().await.map_err(|e| {
            CapabilityError::Transient(format!("unreadable reply from {}: {}", self.label, e))
        })?;
        let content = extract_content(&body).ok_or_else(|| {
            CapabilityError::Transient(format!("no message content in reply from {}", self.label))
        })?;
        non_empty(content, &self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_chat_completions_shape() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "Hello"}}]});
        assert_eq!(extract_content(&body).as_deref(), Some("Hello"));
    }

    #[test]
    fn test_extract_simple_shape() {
        let body = json!({"response": "Local hello"});
        assert_eq!(extract_content(&body).as_deref(), Some("Local hello"));
        assert_eq!(extract_content(&json!({"output": 1})), None);
    }

    #[test]
    fn test_payload_includes_model_only_when_set() {
        let local = OpenAiCompatibleBackend::new(
            "http://localhost:8000/",
            "/v1/chat/completions",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(local.url, "http://localhost:8000/v1/chat/completions");
        let payload = local.payload("sys", "user", ChatOptions::voting());
        assert!(payload.get("model").is_none());
        assert_eq!(payload["messages"][1]["content"], "user");
        assert_eq!(payload["max_tokens"], 300);

        let hosted = local.with_model("gpt-4o");
        assert_eq!(hosted.describe(), "openai:gpt-4o");
        assert_eq!(hosted.payload("s", "u", ChatOptions::argument())["model"], "gpt-4o");
    }
}
