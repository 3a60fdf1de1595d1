//! Builds participants and the judge from configuration.

use super::anthropic::AnthropicBackend;
use super::backend::ChatBackend;
use super::llm_judge::LlmJudge;
use super::llm_participant::LlmParticipant;
use super::openai::OpenAiCompatibleBackend;
use super::scripted::ScriptedParticipant;
use crate::config::{
    FileBackendConfig, FileJudgeConfig, FileParticipantConfig, FileProvidersConfig, ProviderKind,
};
use agora_application::{CapabilityError, DeferToScores, Judge, Participant};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum FactoryError {
    #[error("{owner}: {message}")]
    UnknownProvider { owner: String, message: String },

    #[error("{owner}: no API key for {provider} (set {env})")]
    MissingApiKey {
        owner: String,
        provider: ProviderKind,
        env: String,
    },

    #[error("{owner}: could not set up {provider} backend: {source}")]
    Backend {
        owner: String,
        provider: ProviderKind,
        #[source]
        source: CapabilityError,
    },
}

/// Creates participants and judges from `[[participants]]` and `[judge]`.
pub struct ParticipantFactory<'a> {
    providers: &'a FileProvidersConfig,
    offline: bool,
}

impl<'a> ParticipantFactory<'a> {
    pub fn new(providers: &'a FileProvidersConfig) -> Self {
        Self {
            providers,
            offline: false,
        }
    }

    /// Replace every backend with scripted replies.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Build the roster in configuration order.
    ///
    /// An empty list yields the scripted four-persona panel.
    pub fn build_all(
        &self,
        entries: &[FileParticipantConfig],
    ) -> Result<Vec<Arc<dyn Participant>>, FactoryError> {
        if entries.is_empty() {
            info!("No participants configured, using the scripted default panel");
            return Ok(ScriptedParticipant::default_panel()
                .into_iter()
                .map(|p| Arc::new(p) as Arc<dyn Participant>)
                .collect());
        }
        entries.iter().map(|entry| self.build(entry)).collect()
    }

    pub fn build(
        &self,
        entry: &FileParticipantConfig,
    ) -> Result<Arc<dyn Participant>, FactoryError> {
        let owner = format!("participant '{}'", entry.name());
        match self.backend(&owner, &entry.backend)? {
            Some(backend) => {
                debug!("{} uses {}", owner, backend.describe());
                Ok(Arc::new(
                    LlmParticipant::new(entry.persona.clone(), backend)
                        .with_sampling(entry.backend.max_tokens, entry.backend.temperature),
                ))
            }
            None => Ok(Arc::new(
                ScriptedParticipant::new(entry.name())
                    .with_arguments(entry.arguments.clone())
                    .with_rankings(entry.rankings.clone()),
            )),
        }
    }

    /// A scripted judge defers to the scores.
    pub fn build_judge(&self, config: &FileJudgeConfig) -> Result<Arc<dyn Judge>, FactoryError> {
        let owner = format!("judge '{}'", config.name);
        match self.backend(&owner, &config.backend)? {
            Some(backend) => Ok(Arc::new(
                LlmJudge::new(config.name.clone(), backend)
                    .with_override_threshold(config.override_threshold),
            )),
            None => Ok(Arc::new(DeferToScores)),
        }
    }

    /// `None` for scripted (or offline) entries.
    fn backend(
        &self,
        owner: &str,
        config: &FileBackendConfig,
    ) -> Result<Option<Arc<dyn ChatBackend>>, FactoryError> {
        let kind = config
            .provider_kind()
            .map_err(|message| FactoryError::UnknownProvider {
                owner: owner.to_string(),
                message,
            })?;
        if self.offline {
            return Ok(None);
        }

        let setup = |source| FactoryError::Backend {
            owner: owner.to_string(),
            provider: kind,
            source,
        };
        let missing_key = |env: &str| FactoryError::MissingApiKey {
            owner: owner.to_string(),
            provider: kind,
            env: env.to_string(),
        };

        let backend: Arc<dyn ChatBackend> = match kind {
            ProviderKind::Scripted => return Ok(None),
            ProviderKind::OpenAi => {
                let openai = &self.providers.openai;
                let key = openai
                    .resolve_api_key()
                    .ok_or_else(|| missing_key(&openai.api_key_env))?;
                let base_url = config.base_url.as_deref().unwrap_or(&openai.base_url);
                let model = config
                    .model
                    .clone()
                    .unwrap_or_else(|| openai.default_model.clone());
                Arc::new(
                    OpenAiCompatibleBackend::openai(
                        base_url,
                        key,
                        model,
                        Duration::from_secs(openai.request_timeout_secs),
                    )
                    .map_err(setup)?,
                )
            }
            ProviderKind::Anthropic => {
                let anthropic = &self.providers.anthropic;
                let key = anthropic
                    .resolve_api_key()
                    .ok_or_else(|| missing_key(&anthropic.api_key_env))?;
                let base_url = config.base_url.as_deref().unwrap_or(&anthropic.base_url);
                let model = config
                    .model
                    .clone()
                    .unwrap_or_else(|| anthropic.default_model.clone());
                Arc::new(
                    AnthropicBackend::new(
                        base_url,
                        key,
                        anthropic.api_version.clone(),
                        model,
                        Duration::from_secs(anthropic.request_timeout_secs),
                    )
                    .map_err(setup)?,
                )
            }
            ProviderKind::Local => {
                let local = &self.providers.local;
                let base_url = config.base_url.as_deref().unwrap_or(&local.base_url);
                let endpoint = config.endpoint.as_deref().unwrap_or(&local.endpoint);
                let mut backend = OpenAiCompatibleBackend::new(
                    base_url,
                    endpoint,
                    Duration::from_secs(local.request_timeout_secs),
                )
                .map_err(setup)?;
                if let Some(token) = config.auth_token.as_ref().or(local.auth_token.as_ref()) {
                    backend = backend.with_bearer_token(token.clone());
                }
                if let Some(model) = &config.model {
                    backend = backend.with_model(model.clone());
                }
                Arc::new(backend)
            }
        };
        Ok(Some(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;

    fn config(toml_str: &str) -> FileConfig {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_empty_roster_uses_default_panel() {
        let providers = FileProvidersConfig::default();
        let participants = ParticipantFactory::new(&providers).build_all(&[]).unwrap();
        let names: Vec<&str> = participants.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(names, vec!["Optimist", "Skeptic", "Visionary", "Critic"]);
    }

    #[test]
    fn test_builds_in_registration_order() {
        let config = config(
            r#"
[[participants]]
name = "Local"
provider = "local"

[[participants]]
name = "Scripted"
"#,
        );
        let participants = ParticipantFactory::new(&config.providers)
            .build_all(&config.participants)
            .unwrap();
        assert_eq!(participants[0].id().as_str(), "Local");
        assert_eq!(participants[1].id().as_str(), "Scripted");
    }

    #[test]
    fn test_unknown_provider_fails() {
        let config = config(
            r#"
[[participants]]
name = "Oracle"
provider = "crystal-ball"
"#,
        );
        let err = ParticipantFactory::new(&config.providers)
            .build_all(&config.participants)
            .err()
            .unwrap();
        assert!(matches!(err, FactoryError::UnknownProvider { .. }));
    }

    #[test]
    fn test_missing_api_key_fails_unless_offline() {
        let config = config(
            r#"
[providers.anthropic]
api_key_env = "AGORA_TEST_NEVER_SET_KEY"

[[participants]]
name = "Skeptic"
provider = "anthropic"
"#,
        );
        let err = ParticipantFactory::new(&config.providers)
            .build(&config.participants[0])
            .err()
            .unwrap();
        assert!(matches!(err, FactoryError::MissingApiKey { .. }));
        assert!(err.to_string().contains("AGORA_TEST_NEVER_SET_KEY"));

        let offline = ParticipantFactory::new(&config.providers)
            .offline(true)
            .build(&config.participants[0])
            .unwrap();
        assert_eq!(offline.id().as_str(), "Skeptic");
    }

    #[test]
    fn test_default_judge_defers_to_scores() {
        let providers = FileProvidersConfig::default();
        let judge = ParticipantFactory::new(&providers)
            .build_judge(&FileJudgeConfig::default())
            .unwrap();
        assert_eq!(judge.name(), "scores");
    }
}
