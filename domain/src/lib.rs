//! Domain layer for agora
//!
//! This crate contains the core debate model: who takes part, what they
//! say, how they vote, how votes become scores, when the debate has
//! converged, and how the final verdict is reached. It has no dependencies
//! on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Rounds
//!
//! Round 0 is the opening: every participant states a position without
//! context. From round 1 onward each round has an argument phase followed by
//! a voting phase in which every voter ranks every participant on the
//! round's ballot.
//!
//! ## Consensus
//!
//! Rankings are converted to points with a [`ScoringSystem`]. Consensus
//! holds when the leader's total reaches `threshold × max_attainable`,
//! where `max_attainable = voters × points(rank 1)`.
//!
//! ## Arbitration
//!
//! When the debate converges or runs out of rounds, a judge may confirm or
//! override the score leader. Overrides are gated and must be reasoned.

pub mod arbitration;
pub mod config;
pub mod core;
pub mod debate;
pub mod prompt;
pub mod scoring;
pub mod util;

// Re-export commonly used types
pub use arbitration::{ArbitrationError, Arbitrator, JudgeRuling, Verdict};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    error::ConfigError,
    participant::{ParticipantId, Roster},
    question::Question,
};
pub use debate::{
    Argument, CallKind, ContextVisibility, DebateConfig, ExhaustionCause, Ledger, LedgerError,
    Ranking, RankingViolation, RoundIssue, RoundRecord, RoundState, ScoringSystem,
    SpeakingOrder, TerminationReason,
};
pub use prompt::{
    DebatePromptTemplate, ParsedRanking, Persona, VotingTraits, parse_judge_response,
    parse_ranking_response,
};
pub use scoring::{
    ConsensusCheck, ConsensusDetector, ScoreEngine, ScoreEntry, ScoreError, ScoreTable,
};
