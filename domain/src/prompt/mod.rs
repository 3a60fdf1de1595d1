//! Prompt domain
//!
//! Personas and templates for generating prompts at each phase of a debate,
//! plus parsing of the structured replies.

pub mod parsing;
pub mod persona;
mod template;

pub use parsing::{ParsedRanking, parse_judge_response, parse_ranking_response};
pub use persona::{Persona, VotingTraits};
pub use template::DebatePromptTemplate;
