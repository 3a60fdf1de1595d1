//! Participant capability port
//!
//! The round controller depends only on this interface. Remote-service
//! backed, local-server backed and scripted participants all implement it.

use agora_domain::{Argument, Ledger, ParticipantId, Question, Roster};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from a participant (or judge) capability call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// Worth retrying: timeouts, rate limits, server errors, unparseable replies
    #[error("Transient failure: {0}")]
    Transient(String),

    /// Retrying will not help: bad credentials, rejected request, unsupported model
    #[error("Permanent failure: {0}")]
    Permanent(String),
}

impl CapabilityError {
    pub fn is_transient(&self) -> bool {
        matches!(self, CapabilityError::Transient(_))
    }

    pub fn message(&self) -> &str {
        match self {
            CapabilityError::Transient(m) | CapabilityError::Permanent(m) => m,
        }
    }
}

/// Context for producing an argument.
///
/// `history` holds every completed round. `same_round` holds arguments
/// already committed in this round by earlier speakers; it is empty in the
/// opening round and under concurrent visibility.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentRequest<'a> {
    pub question: &'a Question,
    pub round: usize,
    pub history: &'a Ledger,
    pub same_round: &'a [Argument],
}

/// Context for producing a ranking of `ballot`.
#[derive(Debug, Clone, Copy)]
pub struct RankingRequest<'a> {
    pub question: &'a Question,
    pub round: usize,
    pub history: &'a Ledger,
    /// The complete round's arguments
    pub arguments: &'a [Argument],
    /// Participants to rank, registration order
    pub ballot: &'a Roster,
}

/// A voter's reply before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingDraft {
    /// Best first
    pub order: Vec<ParticipantId>,
    pub reasoning: String,
}

impl RankingDraft {
    pub fn new(order: Vec<ParticipantId>, reasoning: impl Into<String>) -> Self {
        Self {
            order,
            reasoning: reasoning.into(),
        }
    }
}

/// A debater.
///
/// Implementations handle their own transport timeouts and report them as
/// [`CapabilityError::Transient`]. Retrying is the caller's job.
#[async_trait]
pub trait Participant: Send + Sync {
    /// Stable identity; must be unique within a debate
    fn id(&self) -> &ParticipantId;

    /// Produce the argument text for `request.round`.
    async fn produce_argument(
        &self,
        request: ArgumentRequest<'_>,
    ) -> Result<String, CapabilityError>;

    /// Rank every member of `request.ballot`, best first.
    async fn produce_ranking(
        &self,
        request: RankingRequest<'_>,
    ) -> Result<RankingDraft, CapabilityError>;
}
