//! Judge settings from TOML (`[judge]` section)
//!
//! ```toml
//! [judge]
//! may_override = true
//! override_threshold = 0.9
//! provider = "anthropic"
//! model = "claude-sonnet-4-20250514"
//! ```
//!
//! With the default `scripted` provider the score outcome is confirmed as is.

use super::participants::{FileBackendConfig, ProviderKind};
use serde::{Deserialize, Serialize};

/// Raw judge settings from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileJudgeConfig {
    pub name: String,
    /// Whether the judge may overrule the scored outcome
    pub may_override: bool,
    /// Conviction the judge is asked to reach before overriding (0..=1)
    pub override_threshold: f64,
    #[serde(flatten)]
    pub backend: FileBackendConfig,
}

impl Default for FileJudgeConfig {
    fn default() -> Self {
        Self {
            name: "Judge".to_string(),
            may_override: true,
            override_threshold: 0.9,
            backend: FileBackendConfig::default(),
        }
    }
}

impl FileJudgeConfig {
    /// Whether a model reviews the debate (any provider but `scripted`).
    pub fn is_model_backed(&self) -> bool {
        !matches!(self.backend.provider_kind(), Ok(ProviderKind::Scripted))
    }
}
