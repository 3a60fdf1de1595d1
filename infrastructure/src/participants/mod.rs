//! Participant and judge adapters.
//!
//! - [`LlmParticipant`] / [`LlmJudge`]: a persona played by a chat model
//!   behind a [`ChatBackend`]
//! - [`OpenAiCompatibleBackend`]: OpenAI and local chat-completions servers
//! - [`AnthropicBackend`]: Anthropic messages API
//! - [`ScriptedParticipant`]: canned replies for offline runs
//! - [`ParticipantFactory`]: builds all of the above from configuration

mod anthropic;
mod backend;
mod factory;
mod llm_judge;
mod llm_participant;
mod openai;
mod scripted;

pub use anthropic::AnthropicBackend;
pub use backend::{ChatBackend, ChatOptions};
pub use factory::{FactoryError, ParticipantFactory};
pub use llm_judge::LlmJudge;
pub use llm_participant::LlmParticipant;
pub use openai::OpenAiCompatibleBackend;
pub use scripted::ScriptedParticipant;
