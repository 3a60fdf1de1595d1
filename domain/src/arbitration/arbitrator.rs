//! Arbitrator: ledger + final scores + judge ruling → [`Verdict`].
//!
//! The default outcome adopts the score leader. A judge may replace it only
//! when overrides are enabled and the override comes with reasoning; any
//! other override is a contract violation and no verdict is produced.

use crate::arbitration::verdict::{JudgeRuling, Verdict};
use crate::core::participant::ParticipantId;
use crate::debate::config::DebateConfig;
use crate::debate::ledger::Ledger;
use crate::debate::state::{ExhaustionCause, TerminationReason};
use crate::scoring::score::ScoreTable;
use thiserror::Error;

/// Fatal arbitration failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArbitrationError {
    #[error("Arbitrator contract violation: override to '{0}' attempted while overrides are disabled")]
    OverrideDisabled(ParticipantId),

    #[error("Arbitrator contract violation: override to '{0}' has no reasoning")]
    MissingReasoning(ParticipantId),

    #[error("Arbitrator contract violation: override names unregistered participant '{0}'")]
    UnknownWinner(ParticipantId),

    #[error("No candidate winner: the roster is empty")]
    NoCandidate,
}

impl ArbitrationError {
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, ArbitrationError::NoCandidate)
    }
}

/// Stateless arbitrator
pub struct Arbitrator;

impl Arbitrator {
    /// Winner when the judge confirms.
    ///
    /// 1. On roster collapse, the sole remaining ballot member.
    /// 2. Otherwise the top final score, ties broken by registration order.
    /// 3. Without any score table, the first registered participant.
    pub fn default_winner(
        ledger: &Ledger,
        final_scores: Option<&ScoreTable>,
        termination: TerminationReason,
    ) -> Option<ParticipantId> {
        if termination == TerminationReason::Exhausted(ExhaustionCause::RosterCollapse)
            && let Some(last) = ledger.last()
            && last.ballot.len() == 1
        {
            return last.ballot.first().cloned();
        }

        final_scores
            .and_then(|scores| Self::leader(ledger, scores))
            .or_else(|| ledger.roster().first().cloned())
    }

    /// Top scorer; among equals the earliest registered wins.
    fn leader(ledger: &Ledger, scores: &ScoreTable) -> Option<ParticipantId> {
        scores
            .leaders()
            .into_iter()
            .min_by_key(|id| ledger.roster().position(id).unwrap_or(usize::MAX))
            .cloned()
    }

    /// Produce the verdict.
    pub fn adjudicate(
        ledger: &Ledger,
        final_scores: Option<&ScoreTable>,
        termination: TerminationReason,
        config: &DebateConfig,
        ruling: JudgeRuling,
    ) -> Result<Verdict, ArbitrationError> {
        let default = Self::default_winner(ledger, final_scores, termination)
            .ok_or(ArbitrationError::NoCandidate)?;

        let tied_leaders: Vec<ParticipantId> = match final_scores {
            Some(scores) if !Self::collapsed(termination) => {
                let leaders = scores.leaders();
                if leaders.len() > 1 {
                    leaders.into_iter().cloned().collect()
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        };

        let (winner, overridden, override_reasoning, commentary) = match ruling {
            JudgeRuling::Confirm { commentary } => (default, false, None, commentary),
            JudgeRuling::Override { winner, reasoning } => {
                if !config.judge_may_override {
                    return Err(ArbitrationError::OverrideDisabled(winner));
                }
                if reasoning.trim().is_empty() {
                    return Err(ArbitrationError::MissingReasoning(winner));
                }
                if !ledger.roster().contains(&winner) {
                    return Err(ArbitrationError::UnknownWinner(winner));
                }
                if winner == default {
                    // Naming the default winner changes nothing.
                    (default, false, None, Some(reasoning))
                } else {
                    (winner, true, Some(reasoning), None)
                }
            }
        };

        let winning_position = ledger.latest_position(&winner).map(|a| a.text.clone());

        Ok(Verdict {
            consensus_reached: termination.is_converged(),
            winner,
            tied_leaders,
            overridden,
            override_reasoning,
            termination,
            winning_position,
            commentary,
        })
    }

    fn collapsed(termination: TerminationReason) -> bool {
        termination == TerminationReason::Exhausted(ExhaustionCause::RosterCollapse)
    }
}
