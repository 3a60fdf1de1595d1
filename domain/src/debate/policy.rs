//! Per-round dispatch policies: who speaks first, and what they can see.

use crate::core::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reproducible per-round speaking order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakingOrder {
    /// Registration order every round
    #[default]
    Registration,
    /// Round `i` starts with participant `i mod n`
    Rotating,
}

impl SpeakingOrder {
    /// Order `members` (registration order) for `round`.
    pub fn arrange<'a>(
        &self,
        members: &'a [ParticipantId],
        round: usize,
    ) -> Vec<&'a ParticipantId> {
        match self {
            SpeakingOrder::Registration => members.iter().collect(),
            SpeakingOrder::Rotating => {
                if members.is_empty() {
                    return Vec::new();
                }
                let start = round % members.len();
                members[start..].iter().chain(&members[..start]).collect()
            }
        }
    }
}

impl fmt::Display for SpeakingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeakingOrder::Registration => write!(f, "registration"),
            SpeakingOrder::Rotating => write!(f, "rotating"),
        }
    }
}

impl std::str::FromStr for SpeakingOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "registration" | "fixed" => Ok(SpeakingOrder::Registration),
            "rotating" | "rotate" => Ok(SpeakingOrder::Rotating),
            _ => Err(format!("Invalid SpeakingOrder: {}", s)),
        }
    }
}

/// Same-round context given to speakers in an argument phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextVisibility {
    /// One speaker at a time; each sees the arguments made before it
    #[default]
    Sequential,
    /// Everyone argues at once and sees no same-round arguments
    Concurrent,
}

impl ContextVisibility {
    pub fn is_concurrent(&self) -> bool {
        matches!(self, ContextVisibility::Concurrent)
    }
}

impl fmt::Display for ContextVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextVisibility::Sequential => write!(f, "sequential"),
            ContextVisibility::Concurrent => write!(f, "concurrent"),
        }
    }
}

impl std::str::FromStr for ContextVisibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" | "seq" => Ok(ContextVisibility::Sequential),
            "concurrent" | "parallel" => Ok(ContextVisibility::Concurrent),
            _ => Err(format!("Invalid ContextVisibility: {}", s)),
        }
    }
}
