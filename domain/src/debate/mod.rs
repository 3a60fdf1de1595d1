//! Debate domain
//!
//! The debate is a sequence of rounds. Round 0 is the opening statement
//! round; from round 1 onward each round has an argument phase followed by
//! a voting phase. Everything that happens is recorded in the [`Ledger`].

pub mod argument;
pub mod config;
pub mod ledger;
pub mod policy;
pub mod ranking;
pub mod state;

pub use argument::Argument;
pub use config::{DebateConfig, ScoringSystem};
pub use ledger::{CallKind, Ledger, LedgerError, RoundIssue, RoundRecord};
pub use policy::{ContextVisibility, SpeakingOrder};
pub use ranking::{Ranking, RankingViolation};
pub use state::{ExhaustionCause, RoundState, TerminationReason};
