//! Non-fatal configuration findings.
//!
//! Fatal problems are [`ConfigError`](crate::ConfigError)s raised when the
//! debate is constructed. Everything here is reported to the user but does
//! not stop a run unless its severity is [`Severity::Error`].

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A string field holds a value its enum does not accept.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// Judge conviction threshold is below the consensus threshold.
    OverrideBelowConsensus,
    /// Override threshold is set but overrides are disabled.
    OverrideThresholdUnused,
    /// Persona trait scores are out of range or contradictory.
    PersonaTraits,
    /// A participant's provider has no API key configured.
    MissingApiKey,
    /// A participant names a provider that does not exist.
    UnknownProvider,
    /// Concurrent visibility removes same-round engagement.
    ConcurrentVisibility,
    /// Retry budget of zero attempts.
    NoAttempts,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.severity {
            Severity::Error => write!(f, "error: {}", self.message),
            Severity::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = ConfigIssue::warning(ConfigIssueCode::NoAttempts, "max_attempts is 0");
        assert!(!issue.is_error());
        assert_eq!(issue.to_string(), "warning: max_attempts is 0");
        assert!(ConfigIssue::error(ConfigIssueCode::UnknownProvider, "x").is_error());
    }
}
