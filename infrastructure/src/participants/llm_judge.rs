//! Judge backed by a chat model.

use super::backend::{ChatBackend, ChatOptions};
use agora_application::{ArbitrationRequest, CapabilityError, Judge};
use agora_domain::{DebatePromptTemplate, JudgeRuling, parse_judge_response};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub struct LlmJudge {
    name: String,
    backend: Arc<dyn ChatBackend>,
    /// Conviction the judge is asked to reach before overriding
    override_threshold: f64,
}

impl LlmJudge {
    pub fn new(name: impl Into<String>, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            name: name.into(),
            backend,
            override_threshold: 0.9,
        }
    }

    pub fn with_override_threshold(mut self, threshold: f64) -> Self {
        self.override_threshold = threshold;
        self
    }
}

#[async_trait]
impl Judge for LlmJudge {
    fn name(&self) -> &str {
        &self.name
    }

    async fn deliberate(
        &self,
        request: ArbitrationRequest<'_>,
    ) -> Result<JudgeRuling, CapabilityError> {
        let prompt = DebatePromptTemplate::judge(
            request.ledger,
            request.final_scores,
            request.default_winner,
            request.termination.is_converged(),
            request.may_override,
            self.override_threshold,
        );
        debug!("{} deliberating via {}", self.name, self.backend.describe());

        let reply = self
            .backend
            .complete(
                DebatePromptTemplate::judge_system(),
                &prompt,
                ChatOptions::judging(),
            )
            .await?;
        Ok(parse_judge_response(&reply, request.ledger.roster()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participants::llm_participant::tests::CannedBackend;
    use agora_domain::{
        ExhaustionCause, Ledger, ParticipantId, Question, Roster, TerminationReason,
    };

    fn ledger() -> Ledger {
        let roster = Roster::new(vec!["Optimist".into(), "Critic".into()]).unwrap();
        Ledger::new(Question::try_new("Adopt Rust?").unwrap(), roster)
    }

    #[tokio::test]
    async fn test_judge_override_reply() {
        let backend = Arc::new(CannedBackend::new(&[
            r#"{"decision": "override", "winner": "critic", "reasoning": "Migration cost ignored"}"#,
        ]));
        let judge = LlmJudge::new("Judge", backend.clone()).with_override_threshold(0.8);
        let ledger = ledger();
        let default_winner: ParticipantId = "Optimist".into();
        let ruling = judge
            .deliberate(ArbitrationRequest {
                ledger: &ledger,
                final_scores: None,
                termination: TerminationReason::Exhausted(ExhaustionCause::IterationLimit),
                default_winner: &default_winner,
                may_override: true,
            })
            .await
            .unwrap();

        assert_eq!(
            ruling,
            JudgeRuling::override_with("Critic".into(), "Migration cost ignored")
        );
        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].1.contains("80%"));
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let backend = Arc::new(CannedBackend::new(&[]));
        let judge = LlmJudge::new("Judge", backend);
        let ledger = ledger();
        let default_winner: ParticipantId = "Optimist".into();
        let result = judge
            .deliberate(ArbitrationRequest {
                ledger: &ledger,
                final_scores: None,
                termination: TerminationReason::Converged,
                default_winner: &default_winner,
                may_override: false,
            })
            .await;
        assert!(result.is_err());
    }
}
