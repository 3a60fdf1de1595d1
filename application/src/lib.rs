//! Application layer for agora
//!
//! This crate contains the round controller use case, the ports that
//! participants, judges, progress reporters and conversation loggers
//! implement, and the execution parameters that control call dispatch.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    conversation_logger::{
        ConversationEvent, ConversationLogger, DebatePhase, NoConversationLogger,
    },
    judge::{ArbitrationRequest, DeferToScores, Judge},
    participant::{ArgumentRequest, CapabilityError, Participant, RankingDraft, RankingRequest},
    progress::{DebateProgressNotifier, NoProgress},
};
pub use use_cases::run_debate::{DebateOutcome, RunDebateError, RunDebateInput, RunDebateUseCase};
