//! Infrastructure layer for agora
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: HTTP chat backends and scripted participants,
//! configuration file loading, the JSONL transcript logger and the
//! on-disk debate archive.

pub mod archive;
pub mod config;
pub mod logging;
pub mod participants;

// Re-export commonly used types
pub use archive::{ArchiveError, DebateArchive};
pub use config::{
    ConfigLoader, FileConfig, FileJudgeConfig, FileOutputConfig, FileOutputFormat,
    FileParticipantConfig, ProviderKind,
};
pub use logging::JsonlConversationLogger;
pub use participants::{
    AnthropicBackend, ChatBackend, ChatOptions, FactoryError, LlmJudge, LlmParticipant,
    OpenAiCompatibleBackend, ParticipantFactory, ScriptedParticipant,
};
