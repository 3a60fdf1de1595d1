//! Participant and backend entries from TOML (`[[participants]]`)
//!
//! Each entry names a provider, optional connection overrides, and the
//! persona fields inline:
//!
//! ```toml
//! [[participants]]
//! name = "Skeptic"
//! provider = "anthropic"
//! model = "claude-sonnet-4-20250514"
//! role = "Risk analyst"
//! conviction = 8
//! openness = 4
//!
//! [participants.voting]
//! fairness = 8
//!
//! [[participants]]
//! name = "Local"
//! provider = "local"
//! base_url = "http://localhost:8080"
//! ```

use agora_domain::Persona;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a participant's replies come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Local,
    /// Canned replies, no network
    #[default]
    Scripted,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::Local => write!(f, "local"),
            ProviderKind::Scripted => write!(f, "scripted"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "gpt" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "local" => Ok(ProviderKind::Local),
            "scripted" | "offline" => Ok(ProviderKind::Scripted),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl ProviderKind {
    pub const VALID_VALUES: [&'static str; 4] = ["openai", "anthropic", "local", "scripted"];

    /// Whether this provider needs an API key
    pub fn needs_api_key(&self) -> bool {
        matches!(self, ProviderKind::OpenAi | ProviderKind::Anthropic)
    }
}

/// Connection settings shared by participants and the judge.
///
/// Unset fields fall back to the matching `[providers.*]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    pub provider: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub endpoint: Option<String>,
    pub auth_token: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default().to_string(),
            model: None,
            base_url: None,
            endpoint: None,
            auth_token: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

impl FileBackendConfig {
    pub fn provider_kind(&self) -> Result<ProviderKind, String> {
        self.provider.parse()
    }
}

/// One `[[participants]]` entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileParticipantConfig {
    #[serde(flatten)]
    pub backend: FileBackendConfig,
    #[serde(flatten)]
    pub persona: Persona,
    /// Scripted arguments per round (round 0 first); the last one repeats.
    /// `{question}` and `{round}` are substituted.
    pub arguments: Vec<String>,
    /// Scripted rankings per voting round (round 1 first); the last one repeats.
    pub rankings: Vec<Vec<String>>,
}

impl FileParticipantConfig {
    pub fn name(&self) -> &str {
        &self.persona.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("OpenAI".parse::<ProviderKind>(), Ok(ProviderKind::OpenAi));
        assert_eq!("claude".parse::<ProviderKind>(), Ok(ProviderKind::Anthropic));
        assert_eq!("offline".parse::<ProviderKind>(), Ok(ProviderKind::Scripted));
        assert!("bedrock".parse::<ProviderKind>().is_err());
        assert!(ProviderKind::Anthropic.needs_api_key());
        assert!(!ProviderKind::Local.needs_api_key());
    }

    #[test]
    fn test_participant_entry_with_inline_persona() {
        let toml_str = r#"
name = "Skeptic"
provider = "anthropic"
model = "claude-sonnet-4-20250514"
role = "Risk analyst"
conviction = 8
temperature = 0.5

[voting]
fairness = 9
"#;
        let entry: FileParticipantConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(entry.name(), "Skeptic");
        assert_eq!(entry.backend.provider_kind(), Ok(ProviderKind::Anthropic));
        assert_eq!(entry.backend.temperature, Some(0.5));
        assert_eq!(entry.persona.role.as_deref(), Some("Risk analyst"));
        assert_eq!(entry.persona.conviction, 8);
        assert_eq!(entry.persona.voting.fairness, 9);
        // Unset traits keep their defaults
        assert_eq!(entry.persona.reasoning_depth, 7);
    }

    #[test]
    fn test_scripted_entry() {
        let toml_str = r#"
name = "Critic"
arguments = ["Round {round}: {question} is risky."]
rankings = [["Critic", "Optimist"], ["Optimist", "Critic"]]
"#;
        let entry: FileParticipantConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(entry.backend.provider_kind(), Ok(ProviderKind::Scripted));
        assert_eq!(entry.rankings.len(), 2);
        assert_eq!(entry.arguments.len(), 1);
    }
}
