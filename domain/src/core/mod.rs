//! Core domain concepts shared across all subdomains.
//!
//! - [`participant::ParticipantId`] / [`participant::Roster`]: who debates
//! - [`question::Question`]: a validated question to pose to the debate
//! - [`error::ConfigError`]: fatal construction-time errors

pub mod error;
pub mod participant;
pub mod question;
