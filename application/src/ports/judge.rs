//! Judge capability port
//!
//! The judge reviews a terminated debate and returns a [`JudgeRuling`]. The
//! arbitrator then enforces the override contract on that ruling.

use crate::ports::participant::CapabilityError;
use agora_domain::{JudgeRuling, Ledger, ParticipantId, ScoreTable, TerminationReason};
use async_trait::async_trait;

/// Everything the judge gets to see
#[derive(Debug, Clone, Copy)]
pub struct ArbitrationRequest<'a> {
    pub ledger: &'a Ledger,
    pub final_scores: Option<&'a ScoreTable>,
    pub termination: TerminationReason,
    /// Winner the scores select if the judge confirms
    pub default_winner: &'a ParticipantId,
    pub may_override: bool,
}

#[async_trait]
pub trait Judge: Send + Sync {
    /// Display name used in logs and reports
    fn name(&self) -> &str;

    async fn deliberate(
        &self,
        request: ArbitrationRequest<'_>,
    ) -> Result<JudgeRuling, CapabilityError>;
}

/// Judge that always confirms the score-derived outcome.
pub struct DeferToScores;

#[async_trait]
impl Judge for DeferToScores {
    fn name(&self) -> &str {
        "scores"
    }

    async fn deliberate(
        &self,
        _request: ArbitrationRequest<'_>,
    ) -> Result<JudgeRuling, CapabilityError> {
        Ok(JudgeRuling::confirm())
    }
}
