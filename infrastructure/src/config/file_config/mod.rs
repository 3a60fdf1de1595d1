//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod debate;
mod execution;
mod judge;
mod logging;
mod output;
mod participants;
mod providers;

pub use debate::{FileDebateConfig, FileScoringSystem};
pub use execution::FileExecutionConfig;
pub use judge::FileJudgeConfig;
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use participants::{FileBackendConfig, FileParticipantConfig, ProviderKind};
pub use providers::{FileAnthropicConfig, FileLocalConfig, FileOpenAiConfig, FileProvidersConfig};

use agora_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Debate rules
    pub debate: FileDebateConfig,
    /// Call dispatch
    pub execution: FileExecutionConfig,
    /// Final review
    pub judge: FileJudgeConfig,
    /// Registered participants, in registration order
    pub participants: Vec<FileParticipantConfig>,
    /// Provider credentials and endpoints
    pub providers: FileProvidersConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Diagnostic and transcript logs
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks:
    /// 1. Enum values in `[execution]`
    /// 2. Judge override settings against the consensus threshold
    /// 3. Providers and credentials of every participant and the judge
    /// 4. Persona trait scores
    ///
    /// Fatal problems with the debate rules themselves (threshold range,
    /// iteration bounds, scoring shape) are `ConfigError`s raised when the
    /// debate is built.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        // 1. Execution
        let (params, mut issues) = self.execution.to_execution_params();
        if params.visibility.is_concurrent() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ConcurrentVisibility,
                "execution.visibility: concurrent speakers do not see each other's arguments \
                 within a round",
            ));
        }

        // 2. Judge
        let judge = &self.judge;
        if judge.may_override && judge.override_threshold < self.debate.consensus_threshold {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OverrideBelowConsensus,
                format!(
                    "judge.override_threshold ({}) is below debate.consensus_threshold ({}); \
                     the judge may overrule with less conviction than the voters needed",
                    judge.override_threshold, self.debate.consensus_threshold
                ),
            ));
        }
        if !judge.may_override
            && judge.override_threshold != FileJudgeConfig::default().override_threshold
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OverrideThresholdUnused,
                "judge.override_threshold is set but judge.may_override is false",
            ));
        }
        if judge.is_model_backed() {
            issues.extend(self.check_backend(&format!("judge '{}'", judge.name), &judge.backend));
        }

        // 3. Participants
        for entry in &self.participants {
            let label = format!("participant '{}'", entry.name());
            issues.extend(self.check_backend(&label, &entry.backend));

            // 4. Persona traits
            for warning in entry.persona.trait_warnings() {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::PersonaTraits,
                    format!("{}: {}", label, warning),
                ));
            }
        }

        issues
    }

    fn check_backend(&self, label: &str, backend: &FileBackendConfig) -> Vec<ConfigIssue> {
        let kind = match backend.provider_kind() {
            Ok(kind) => kind,
            Err(_) => {
                return vec![ConfigIssue::error(
                    ConfigIssueCode::UnknownProvider,
                    format!(
                        "{}: unknown provider '{}' (expected one of: {})",
                        label,
                        backend.provider,
                        ProviderKind::VALID_VALUES.join(", ")
                    ),
                )];
            }
        };

        let key = match kind {
            ProviderKind::OpenAi => Some((
                self.providers.openai.resolve_api_key(),
                &self.providers.openai.api_key_env,
            )),
            ProviderKind::Anthropic => Some((
                self.providers.anthropic.resolve_api_key(),
                &self.providers.anthropic.api_key_env,
            )),
            ProviderKind::Local | ProviderKind::Scripted => None,
        };

        match key {
            Some((None, env)) => vec![ConfigIssue::warning(
                ConfigIssueCode::MissingApiKey,
                format!("{}: no API key for {} (set {})", label, kind, env),
            )],
            _ => vec![],
        }
    }
}
