//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};

/// Anthropic API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended; prefer the env var).
    pub api_key: Option<String>,
    /// Base URL for the Anthropic API.
    pub base_url: String,
    /// Model used when a participant names none.
    pub default_model: String,
    /// Anthropic API version header.
    pub api_version: String,
    pub request_timeout_secs: u64,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            default_model: "claude-sonnet-4-20250514".to_string(),
            api_version: "2023-06-01".to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl FileAnthropicConfig {
    /// The configured key, else the one in `api_key_env`.
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), &self.api_key_env)
    }
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended; prefer the env var).
    pub api_key: Option<String>,
    /// Base URL for the OpenAI API (can be overridden for Azure OpenAI).
    pub base_url: String,
    pub default_model: String,
    pub request_timeout_secs: u64,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            default_model: "gpt-4o".to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl FileOpenAiConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), &self.api_key_env)
    }
}

/// Local model server speaking the chat-completions protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLocalConfig {
    pub base_url: String,
    pub endpoint: String,
    /// Sent as a bearer token when set
    pub auth_token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for FileLocalConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            endpoint: "/v1/chat/completions".to_string(),
            auth_token: None,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Anthropic API settings.
    pub anthropic: FileAnthropicConfig,
    /// OpenAI API settings.
    pub openai: FileOpenAiConfig,
    /// Local server settings.
    pub local: FileLocalConfig,
}

fn resolve_key(direct: Option<&str>, env: &str) -> Option<String> {
    direct
        .map(str::to_string)
        .or_else(|| std::env::var(env).ok())
        .filter(|k| !k.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_key_wins() {
        let config = FileOpenAiConfig {
            api_key: Some("sk-test".to_string()),
            api_key_env: "AGORA_TEST_UNSET_OPENAI_KEY".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_missing_key() {
        let config = FileAnthropicConfig {
            api_key: Some("  ".to_string()),
            api_key_env: "AGORA_TEST_UNSET_ANTHROPIC_KEY".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key(), None);
    }

    #[test]
    fn test_local_defaults() {
        let toml_str = r#"
[local]
base_url = "http://gpu-box:9000"
"#;
        let config: FileProvidersConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.local.base_url, "http://gpu-box:9000");
        assert_eq!(config.local.endpoint, "/v1/chat/completions");
        assert_eq!(config.local.request_timeout_secs, 30);
    }
}
