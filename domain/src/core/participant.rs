//! Participant identity and the debate roster.

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Stable identifier of a debate participant (Value Object)
///
/// Identifiers are trimmed on creation and compared exactly.
///
/// # Example
///
/// ```
/// use agora_domain::ParticipantId;
///
/// let id = ParticipantId::new("  Skeptic ");
/// assert_eq!(id.as_str(), "Skeptic");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against free text (used when matching
    /// names produced by a model).
    pub fn matches_loosely(&self, text: &str) -> bool {
        self.0.eq_ignore_ascii_case(text.trim())
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        ParticipantId::new(s)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        ParticipantId::new(s)
    }
}

/// Ordered set of participants.
///
/// Order is registration order and is the tie-break order used everywhere
/// a deterministic choice between equals is needed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    members: Vec<ParticipantId>,
}

impl Roster {
    /// Minimum number of registered participants for a debate.
    pub const MIN_PARTICIPANTS: usize = 2;

    /// Build the registered roster of a debate.
    pub fn new(members: Vec<ParticipantId>) -> Result<Self, ConfigError> {
        if members.len() < Self::MIN_PARTICIPANTS {
            return Err(ConfigError::Roster(format!(
                "a debate needs at least {} participants, got {}",
                Self::MIN_PARTICIPANTS,
                members.len()
            )));
        }
        for (i, member) in members.iter().enumerate() {
            if member.as_str().is_empty() {
                return Err(ConfigError::Roster(
                    "participant names cannot be empty".to_string(),
                ));
            }
            if members[..i].contains(member) {
                return Err(ConfigError::Roster(format!(
                    "duplicate participant '{}'",
                    member
                )));
            }
        }
        Ok(Self { members })
    }

    /// Sub-roster of the members accepted by `keep`, preserving order.
    ///
    /// Used for per-round live rosters, which may legitimately shrink below
    /// the registration minimum.
    pub fn retain(&self, mut keep: impl FnMut(&ParticipantId) -> bool) -> Self {
        Self {
            members: self.members.iter().filter(|m| keep(m)).cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.members.contains(id)
    }

    /// Registration index of a member.
    pub fn position(&self, id: &ParticipantId) -> Option<usize> {
        self.members.iter().position(|m| m == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticipantId> {
        self.members.iter()
    }

    pub fn members(&self) -> &[ParticipantId] {
        &self.members
    }

    pub fn first(&self) -> Option<&ParticipantId> {
        self.members.first()
    }

    /// Find a member by loose (case-insensitive) name.
    pub fn find_loosely(&self, text: &str) -> Option<&ParticipantId> {
        self.members.iter().find(|m| m.matches_loosely(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<ParticipantId> {
        names.iter().map(|n| ParticipantId::from(*n)).collect()
    }

    #[test]
    fn test_roster_preserves_registration_order() {
        let roster = Roster::new(ids(&["b", "a", "c"])).unwrap();
        assert_eq!(roster.position(&"b".into()), Some(0));
        assert_eq!(roster.position(&"c".into()), Some(2));
        assert_eq!(roster.first(), Some(&ParticipantId::from("b")));
    }

    #[test]
    fn test_roster_rejects_duplicates() {
        let err = Roster::new(ids(&["a", "b", "a"])).unwrap_err();
        assert!(err.to_string().contains("duplicate participant 'a'"));
    }

    #[test]
    fn test_roster_rejects_too_few() {
        assert!(Roster::new(ids(&["solo"])).is_err());
    }

    #[test]
    fn test_roster_rejects_blank_names() {
        assert!(Roster::new(ids(&["a", "   "])).is_err());
    }

    #[test]
    fn test_retain_keeps_order() {
        let roster = Roster::new(ids(&["a", "b", "c", "d"])).unwrap();
        let live = roster.retain(|m| m.as_str() != "b");
        assert_eq!(live.members(), ids(&["a", "c", "d"]).as_slice());
    }

    #[test]
    fn test_find_loosely() {
        let roster = Roster::new(ids(&["Claude Optimist", "GPT Critic"])).unwrap();
        assert_eq!(
            roster.find_loosely(" gpt critic "),
            Some(&ParticipantId::from("GPT Critic"))
        );
        assert!(roster.find_loosely("nobody").is_none());
    }
}
