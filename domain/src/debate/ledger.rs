//! History Ledger: the append-only transcript of a debate.
//!
//! The round controller is the only writer. Everybody else (participants,
//! the arbitrator, reporters, tests) reads through `&Ledger` or a cloned
//! snapshot. Records are never edited after [`Ledger::append`].

use crate::core::participant::{ParticipantId, Roster};
use crate::core::question::Question;
use crate::debate::argument::Argument;
use crate::debate::ranking::{Ranking, RankingViolation};
use crate::scoring::consensus::ConsensusCheck;
use crate::scoring::score::ScoreTable;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which capability call a forfeit happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    Argument,
    Ranking,
}

impl std::fmt::Display for CallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallKind::Argument => write!(f, "argument"),
            CallKind::Ranking => write!(f, "ranking"),
        }
    }
}

/// A non-fatal problem recorded alongside the round it happened in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundIssue {
    /// Capability kept failing; the participant sat this call out.
    Forfeit {
        participant: ParticipantId,
        call: CallKind,
        attempts: usize,
        reason: String,
    },
    /// The voter's ranking broke the total-order invariant and was not scored.
    Disqualified {
        voter: ParticipantId,
        violation: RankingViolation,
    },
}

impl RoundIssue {
    pub fn participant(&self) -> &ParticipantId {
        match self {
            RoundIssue::Forfeit { participant, .. } => participant,
            RoundIssue::Disqualified { voter, .. } => voter,
        }
    }
}

impl std::fmt::Display for RoundIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundIssue::Forfeit {
                participant,
                call,
                attempts,
                reason,
            } => write!(
                f,
                "{} forfeited its {} after {} attempt(s): {}",
                participant, call, attempts, reason
            ),
            RoundIssue::Disqualified { voter, violation } => {
                write!(f, "{}'s ranking was disqualified: {}", voter, violation)
            }
        }
    }
}

/// Everything that happened in one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: usize,
    /// Participants whose argument was committed this round
    pub ballot: Roster,
    /// Committed arguments in speaking order
    pub arguments: Vec<Argument>,
    /// Scored (valid) rankings; `None` when the round had no voting phase
    pub votes: Option<Vec<Ranking>>,
    pub scores: Option<ScoreTable>,
    /// Present only when the consensus detector ran for this round
    pub consensus: Option<ConsensusCheck>,
    pub issues: Vec<RoundIssue>,
}

impl RoundRecord {
    /// Record for a round without a voting phase (round 0, roster collapse).
    pub fn arguments_only(
        round: usize,
        ballot: Roster,
        arguments: Vec<Argument>,
        issues: Vec<RoundIssue>,
    ) -> Self {
        Self {
            round,
            ballot,
            arguments,
            votes: None,
            scores: None,
            consensus: None,
            issues,
        }
    }

    pub fn argument_of(&self, id: &ParticipantId) -> Option<&Argument> {
        self.arguments.iter().find(|a| &a.participant == id)
    }

    pub fn vote_of(&self, voter: &ParticipantId) -> Option<&Ranking> {
        self.votes
            .as_ref()
            .and_then(|votes| votes.iter().find(|v| &v.voter == voter))
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Ledger append failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Out-of-order round: expected round {expected}, got {actual}")]
    OutOfOrder { expected: usize, actual: usize },

    #[error("Argument for round {actual} filed under round {expected}")]
    MisfiledArgument { expected: usize, actual: usize },
}

/// Append-only debate transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    question: Question,
    roster: Roster,
    rounds: Vec<RoundRecord>,
}

impl Ledger {
    pub fn new(question: Question, roster: Roster) -> Self {
        Self {
            question,
            roster,
            rounds: Vec::new(),
        }
    }

    /// Append the next round. Rounds must arrive as 0, 1, 2, …
    pub fn append(&mut self, record: RoundRecord) -> Result<(), LedgerError> {
        let expected = self.rounds.len();
        if record.round != expected {
            return Err(LedgerError::OutOfOrder {
                expected,
                actual: record.round,
            });
        }
        if let Some(arg) = record.arguments.iter().find(|a| a.round != expected) {
            return Err(LedgerError::MisfiledArgument {
                expected,
                actual: arg.round,
            });
        }
        self.rounds.push(record);
        Ok(())
    }

    // ==================== Read-only views ====================

    pub fn question(&self) -> &Question {
        &self.question
    }

    /// Registered roster (registration order)
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    pub fn round(&self, index: usize) -> Option<&RoundRecord> {
        self.rounds.get(index)
    }

    pub fn last(&self) -> Option<&RoundRecord> {
        self.rounds.last()
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Number of rounds that carried a voting phase.
    pub fn voting_rounds(&self) -> usize {
        self.rounds.iter().filter(|r| r.votes.is_some()).count()
    }

    /// Score tables in round order.
    pub fn score_trend(&self) -> Vec<&ScoreTable> {
        self.rounds.iter().filter_map(|r| r.scores.as_ref()).collect()
    }

    /// Points of one participant per voting round (0 when absent).
    pub fn trend_for(&self, id: &ParticipantId) -> Vec<u32> {
        self.score_trend()
            .into_iter()
            .map(|t| t.points(id).unwrap_or(0))
            .collect()
    }

    pub fn latest_scores(&self) -> Option<&ScoreTable> {
        self.rounds.iter().rev().find_map(|r| r.scores.as_ref())
    }

    /// All arguments by one participant, oldest first.
    pub fn arguments_by<'a>(
        &'a self,
        id: &'a ParticipantId,
    ) -> impl Iterator<Item = &'a Argument> + 'a {
        self.rounds.iter().filter_map(move |r| r.argument_of(id))
    }

    /// Most recent argument by `id`: the participant's current position.
    pub fn latest_position(&self, id: &ParticipantId) -> Option<&Argument> {
        self.rounds.iter().rev().find_map(|r| r.argument_of(id))
    }

    /// All recorded issues with their round index.
    pub fn issues(&self) -> impl Iterator<Item = (usize, &RoundIssue)> {
        self.rounds
            .iter()
            .flat_map(|r| r.issues.iter().map(move |i| (r.round, i)))
    }

    /// True when any scored round lost a voter or a ballot member.
    pub fn has_degraded_rounds(&self) -> bool {
        self.rounds.iter().any(RoundRecord::has_issues)
    }
}
