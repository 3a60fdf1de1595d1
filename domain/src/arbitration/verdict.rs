//! Judge rulings and the final verdict.

use crate::core::participant::ParticipantId;
use crate::debate::state::TerminationReason;
use serde::{Deserialize, Serialize};

/// What the judge decided after reviewing the debate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum JudgeRuling {
    /// Keep the score-derived winner
    Confirm {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        commentary: Option<String>,
    },
    /// Replace the score-derived winner
    Override {
        winner: ParticipantId,
        reasoning: String,
    },
}

impl JudgeRuling {
    pub fn confirm() -> Self {
        JudgeRuling::Confirm { commentary: None }
    }

    pub fn confirm_with(commentary: impl Into<String>) -> Self {
        JudgeRuling::Confirm {
            commentary: Some(commentary.into()),
        }
    }

    pub fn override_with(winner: ParticipantId, reasoning: impl Into<String>) -> Self {
        JudgeRuling::Override {
            winner,
            reasoning: reasoning.into(),
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self, JudgeRuling::Override { .. })
    }
}

/// Final outcome of a debate. Exactly one is produced per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// True only when the round loop ended in genuine consensus
    pub consensus_reached: bool,
    pub winner: ParticipantId,
    /// Participants sharing the top final score when more than one did
    pub tied_leaders: Vec<ParticipantId>,
    pub overridden: bool,
    /// Present iff `overridden`
    pub override_reasoning: Option<String>,
    pub termination: TerminationReason,
    /// The winner's most recent argument
    pub winning_position: Option<String>,
    pub commentary: Option<String>,
}

impl Verdict {
    /// Whether the winner was picked out of a tie at the top.
    pub fn was_tie_broken(&self) -> bool {
        !self.overridden && self.tied_leaders.len() > 1
    }
}
