//! Rankings (votes) and their total-order invariant.

use crate::core::participant::{ParticipantId, Roster};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a ranking is not a total order over the round's ballot
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "participant", rename_all = "snake_case")]
pub enum RankingViolation {
    #[error("'{0}' is ranked more than once")]
    Duplicate(ParticipantId),

    #[error("'{0}' is missing from the ranking")]
    Missing(ParticipantId),

    #[error("'{0}' is not on this round's ballot")]
    Unknown(ParticipantId),

    #[error("voter '{0}' is not on this round's ballot")]
    VoterNotOnBallot(ParticipantId),
}

/// A voter's best → worst ordering of every participant on the ballot,
/// the voter included.
///
/// # Example
///
/// ```
/// use agora_domain::{ParticipantId, Ranking, Roster};
///
/// let ballot = Roster::new(vec!["a".into(), "b".into(), "c".into()]).unwrap();
/// let vote = Ranking::new("a".into(), 1, vec!["b".into(), "a".into(), "c".into()], "b argued best");
/// assert!(vote.validate(&ballot).is_ok());
///
/// let partial = Ranking::new("a".into(), 1, vec!["b".into(), "a".into()], "");
/// assert!(partial.validate(&ballot).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    pub voter: ParticipantId,
    pub round: usize,
    /// Best first
    pub order: Vec<ParticipantId>,
    pub reasoning: String,
}

impl Ranking {
    pub fn new(
        voter: ParticipantId,
        round: usize,
        order: Vec<ParticipantId>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            voter,
            round,
            order,
            reasoning: reasoning.into(),
        }
    }

    /// Check that the order is a permutation of `ballot` and that the voter
    /// is on it.
    pub fn validate(&self, ballot: &Roster) -> Result<(), RankingViolation> {
        if !ballot.contains(&self.voter) {
            return Err(RankingViolation::VoterNotOnBallot(self.voter.clone()));
        }
        for (i, id) in self.order.iter().enumerate() {
            if !ballot.contains(id) {
                return Err(RankingViolation::Unknown(id.clone()));
            }
            if self.order[..i].contains(id) {
                return Err(RankingViolation::Duplicate(id.clone()));
            }
        }
        if let Some(missing) = ballot.iter().find(|m| !self.order.contains(m)) {
            return Err(RankingViolation::Missing(missing.clone()));
        }
        Ok(())
    }

    /// 1-based rank given to `id`.
    pub fn rank_of(&self, id: &ParticipantId) -> Option<usize> {
        self.order.iter().position(|p| p == id).map(|i| i + 1)
    }

    pub fn first_choice(&self) -> Option<&ParticipantId> {
        self.order.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ballot() -> Roster {
        Roster::new(vec!["a".into(), "b".into(), "c".into(), "d".into()]).unwrap()
    }

    fn vote(voter: &str, order: &[&str]) -> Ranking {
        Ranking::new(
            voter.into(),
            1,
            order.iter().map(|s| ParticipantId::from(*s)).collect(),
            "",
        )
    }

    #[test]
    fn test_valid_permutation() {
        assert!(vote("a", &["d", "c", "b", "a"]).validate(&ballot()).is_ok());
    }

    #[test]
    fn test_omission_rejected() {
        assert_eq!(
            vote("a", &["a", "b", "c"]).validate(&ballot()),
            Err(RankingViolation::Missing("d".into()))
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        assert_eq!(
            vote("a", &["a", "b", "b", "c"]).validate(&ballot()),
            Err(RankingViolation::Duplicate("b".into()))
        );
    }

    #[test]
    fn test_unknown_rejected() {
        assert_eq!(
            vote("a", &["a", "b", "c", "z"]).validate(&ballot()),
            Err(RankingViolation::Unknown("z".into()))
        );
    }

    #[test]
    fn test_forfeited_participant_cannot_be_ranked() {
        let live = ballot().retain(|m| m.as_str() != "d");
        assert_eq!(
            vote("a", &["a", "b", "c", "d"]).validate(&live),
            Err(RankingViolation::Unknown("d".into()))
        );
        assert!(vote("a", &["c", "a", "b"]).validate(&live).is_ok());
    }

    #[test]
    fn test_voter_must_be_on_ballot() {
        assert_eq!(
            vote("z", &["a", "b", "c", "d"]).validate(&ballot()),
            Err(RankingViolation::VoterNotOnBallot("z".into()))
        );
    }

    #[test]
    fn test_rank_of() {
        let v = vote("a", &["c", "a", "b", "d"]);
        assert_eq!(v.rank_of(&"c".into()), Some(1));
        assert_eq!(v.rank_of(&"d".into()), Some(4));
        assert_eq!(v.first_choice(), Some(&ParticipantId::from("c")));
    }
}
