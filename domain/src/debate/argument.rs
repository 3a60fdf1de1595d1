//! Arguments produced by participants.

use crate::core::participant::ParticipantId;
use crate::util::now_millis;
use serde::{Deserialize, Serialize};

/// One participant's contribution to one round (immutable once recorded)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub participant: ParticipantId,
    pub round: usize,
    pub text: String,
    /// Milliseconds since epoch at which the argument was committed
    pub timestamp: u64,
}

impl Argument {
    pub fn new(participant: ParticipantId, round: usize, text: impl Into<String>) -> Self {
        Self {
            participant,
            round,
            text: text.into(),
            timestamp: now_millis(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_creation() {
        let arg = Argument::new("Skeptic".into(), 2, "Costs are understated.");
        assert_eq!(arg.participant.as_str(), "Skeptic");
        assert_eq!(arg.round, 2);
        assert_eq!(arg.word_count(), 3);
        assert!(arg.timestamp > 0);
    }
}
