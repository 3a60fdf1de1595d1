//! Call dispatch settings from TOML (`[execution]` section)
//!
//! ```toml
//! [execution]
//! visibility = "sequential"        # or "concurrent"
//! speaking_order = "registration"  # or "rotating"
//! max_attempts = 3
//! initial_backoff_ms = 500
//! call_timeout_secs = 60
//! ```

use agora_application::ExecutionParams;
use agora_domain::{ConfigIssue, ConfigIssueCode, ContextVisibility, SpeakingOrder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw execution settings from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    /// "sequential" or "concurrent"
    pub visibility: String,
    /// "registration" or "rotating"
    pub speaking_order: String,
    /// Attempts per capability call, including the first
    pub max_attempts: usize,
    /// Delay before the first retry; doubles on each further retry
    pub initial_backoff_ms: u64,
    /// Upper bound on a single call, on top of the provider's own timeout
    pub call_timeout_secs: Option<u64>,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        let defaults = ExecutionParams::default();
        Self {
            visibility: defaults.visibility.to_string(),
            speaking_order: defaults.speaking_order.to_string(),
            max_attempts: defaults.max_attempts,
            initial_backoff_ms: defaults.initial_backoff.as_millis() as u64,
            call_timeout_secs: None,
        }
    }
}

impl FileExecutionConfig {
    /// Parse visibility, falling back to sequential on unknown values.
    pub fn parse_visibility(&self) -> (ContextVisibility, Vec<ConfigIssue>) {
        match self.visibility.parse::<ContextVisibility>() {
            Ok(visibility) => (visibility, vec![]),
            Err(_) => (
                ContextVisibility::default(),
                vec![Self::invalid_value(
                    "visibility",
                    &self.visibility,
                    &["sequential", "concurrent"],
                )],
            ),
        }
    }

    /// Parse speaking order, falling back to registration order on unknown values.
    pub fn parse_speaking_order(&self) -> (SpeakingOrder, Vec<ConfigIssue>) {
        match self.speaking_order.parse::<SpeakingOrder>() {
            Ok(order) => (order, vec![]),
            Err(_) => (
                SpeakingOrder::default(),
                vec![Self::invalid_value(
                    "speaking_order",
                    &self.speaking_order,
                    &["registration", "rotating"],
                )],
            ),
        }
    }

    pub fn to_execution_params(&self) -> (ExecutionParams, Vec<ConfigIssue>) {
        let (visibility, mut issues) = self.parse_visibility();
        let (order, order_issues) = self.parse_speaking_order();
        issues.extend(order_issues);

        if self.max_attempts == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoAttempts,
                "execution.max_attempts is 0; every call is still attempted once",
            ));
        }

        let params = ExecutionParams::default()
            .with_visibility(visibility)
            .with_speaking_order(order)
            .with_max_attempts(self.max_attempts)
            .with_initial_backoff(Duration::from_millis(self.initial_backoff_ms))
            .with_call_timeout(self.call_timeout_secs.map(Duration::from_secs));
        (params, issues)
    }

    fn invalid_value(field: &str, value: &str, valid: &[&str]) -> ConfigIssue {
        ConfigIssue::warning(
            ConfigIssueCode::InvalidEnumValue {
                field: format!("execution.{}", field),
                value: value.to_string(),
                valid_values: valid.iter().map(|v| v.to_string()).collect(),
            },
            format!(
                "execution.{}: unknown value '{}', falling back to '{}'",
                field, value, valid[0]
            ),
        )
    }
}
