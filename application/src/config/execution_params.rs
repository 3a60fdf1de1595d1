//! Execution parameters: how the round controller dispatches calls.
//!
//! [`ExecutionParams`] groups the static parameters that control call
//! dispatch in [`RunDebateUseCase`](crate::use_cases::run_debate::RunDebateUseCase).
//! These are application-layer concerns, not debate rules; the rules live in
//! [`DebateConfig`](agora_domain::DebateConfig).

use agora_domain::{ContextVisibility, SpeakingOrder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Call dispatch parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Same-round visibility during argument phases.
    pub visibility: ContextVisibility,
    /// Per-round speaking order.
    pub speaking_order: SpeakingOrder,
    /// Attempts per capability call before forfeiting (at least 1).
    pub max_attempts: usize,
    /// Delay before the first retry; doubled for each further retry.
    pub initial_backoff: Duration,
    /// Upper bound on a single capability call. Expiry counts as a
    /// transient failure.
    pub call_timeout: Option<Duration>,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            visibility: ContextVisibility::Sequential,
            speaking_order: SpeakingOrder::Registration,
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            call_timeout: None,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_visibility(mut self, visibility: ContextVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_speaking_order(mut self, order: SpeakingOrder) -> Self {
        self.speaking_order = order;
        self
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Delay before retry number `retry` (1-based).
    pub fn backoff_for(&self, retry: usize) -> Duration {
        let factor = 1u32 << retry.saturating_sub(1).min(16);
        self.initial_backoff.saturating_mul(factor)
    }

    /// Attempt budget, never below one.
    pub fn attempts(&self) -> usize {
        self.max_attempts.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert_eq!(params.visibility, ContextVisibility::Sequential);
        assert_eq!(params.speaking_order, SpeakingOrder::Registration);
        assert_eq!(params.max_attempts, 3);
        assert!(params.call_timeout.is_none());
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default()
            .with_visibility(ContextVisibility::Concurrent)
            .with_speaking_order(SpeakingOrder::Rotating)
            .with_max_attempts(0);

        assert!(params.visibility.is_concurrent());
        assert_eq!(params.speaking_order, SpeakingOrder::Rotating);
        assert_eq!(params.attempts(), 1);
    }

    #[test]
    fn test_exponential_backoff() {
        let params = ExecutionParams::default().with_initial_backoff(Duration::from_millis(100));
        assert_eq!(params.backoff_for(1), Duration::from_millis(100));
        assert_eq!(params.backoff_for(2), Duration::from_millis(200));
        assert_eq!(params.backoff_for(3), Duration::from_millis(400));
    }
}
