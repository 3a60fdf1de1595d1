//! Score Engine: rankings → per-participant point totals.

use crate::core::participant::{ParticipantId, Roster};
use crate::debate::config::ScoringSystem;
use crate::debate::ranking::Ranking;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rankings that do not fit the ballot or the scoring system
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("Ranking/roster mismatch: {0}")]
    ConfigMismatch(String),

    #[error("Point totals overflow with {voters} rankings over {participants} participants")]
    Overflow { voters: usize, participants: usize },
}

/// Points of one participant in one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub participant: ParticipantId,
    pub points: u32,
}

/// Per-round point totals, computed fresh each round.
///
/// Entries are kept in registration order of the round's ballot, which is
/// also the order used to break ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub round: usize,
    /// Number of rankings that were scored
    pub voter_count: usize,
    pub entries: Vec<ScoreEntry>,
}

impl ScoreTable {
    pub fn points(&self, id: &ParticipantId) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| &e.participant == id)
            .map(|e| e.points)
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().map(|e| e.points).sum()
    }

    pub fn top_score(&self) -> u32 {
        self.entries.iter().map(|e| e.points).max().unwrap_or(0)
    }

    /// Every participant sharing the top score, in registration order.
    pub fn leaders(&self) -> Vec<&ParticipantId> {
        let top = self.top_score();
        self.entries
            .iter()
            .filter(|e| e.points == top)
            .map(|e| &e.participant)
            .collect()
    }

    /// Entries by descending points; equal points keep registration order.
    pub fn ranked(&self) -> Vec<&ScoreEntry> {
        let mut sorted: Vec<&ScoreEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.points.cmp(&a.points));
        sorted
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Converts a round's rankings into a [`ScoreTable`]
pub struct ScoreEngine;

impl ScoreEngine {
    /// Score `rankings` cast over `ballot`.
    ///
    /// Each ranking must come from a distinct voter on the ballot and be a
    /// total order over it. The scoring system must cover the ballot size.
    ///
    /// # Example
    ///
    /// ```
    /// use agora_domain::{ParticipantId, Ranking, Roster, ScoreEngine, ScoringSystem};
    ///
    /// let ballot = Roster::new(vec!["a".into(), "b".into()]).unwrap();
    /// let scoring = ScoringSystem::new(vec![2, 1]).unwrap();
    /// let votes = vec![
    ///     Ranking::new("a".into(), 1, vec!["a".into(), "b".into()], ""),
    ///     Ranking::new("b".into(), 1, vec!["a".into(), "b".into()], ""),
    /// ];
    /// let table = ScoreEngine::score(1, &votes, &ballot, &scoring).unwrap();
    /// assert_eq!(table.points(&"a".into()), Some(4));
    /// assert_eq!(table.points(&"b".into()), Some(2));
    /// ```
    pub fn score(
        round: usize,
        rankings: &[Ranking],
        ballot: &Roster,
        scoring: &ScoringSystem,
    ) -> Result<ScoreTable, ScoreError> {
        if !scoring.covers(ballot.len()) {
            return Err(ScoreError::ConfigMismatch(format!(
                "scoring system covers {} ranks, ballot has {} participants",
                scoring.ranks(),
                ballot.len()
            )));
        }

        let round_total = u32::try_from(rankings.len())
            .ok()
            .zip(scoring.ballot_total(ballot.len()))
            .and_then(|(voters, per_ballot)| per_ballot.checked_mul(voters));
        if round_total.is_none() {
            return Err(ScoreError::Overflow {
                voters: rankings.len(),
                participants: ballot.len(),
            });
        }

        let mut totals = vec![0u32; ballot.len()];
        for (i, ranking) in rankings.iter().enumerate() {
            if rankings[..i].iter().any(|r| r.voter == ranking.voter) {
                return Err(ScoreError::ConfigMismatch(format!(
                    "voter '{}' submitted more than one ranking",
                    ranking.voter
                )));
            }
            ranking
                .validate(ballot)
                .map_err(|v| ScoreError::ConfigMismatch(format!("{}: {}", ranking.voter, v)))?;

            // validate() guarantees both lookups succeed; no slot exceeds round_total
            for (rank, id) in (1..).zip(&ranking.order) {
                if let (Some(slot), Some(points)) = (ballot.position(id), scoring.points_for(rank))
                {
                    totals[slot] += points;
                }
            }
        }

        Ok(ScoreTable {
            round,
            voter_count: rankings.len(),
            entries: ballot
                .iter()
                .zip(totals)
                .map(|(participant, points)| ScoreEntry {
                    participant: participant.clone(),
                    points,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Roster {
        Roster::new(names.iter().map(|n| ParticipantId::from(*n)).collect()).unwrap()
    }

    fn vote(voter: &str, order: &[&str]) -> Ranking {
        Ranking::new(
            voter.into(),
            1,
            order.iter().map(|s| ParticipantId::from(*s)).collect(),
            "",
        )
    }

    fn demo_round() -> Vec<Ranking> {
        vec![
            vote("opt", &["vis", "opt", "skp", "crt"]),
            vote("skp", &["vis", "skp", "crt", "opt"]),
            vote("vis", &["vis", "opt", "skp", "crt"]),
            vote("crt", &["vis", "crt", "skp", "opt"]),
        ]
    }

    #[test]
    fn test_scores_demo_round() {
        let ballot = roster(&["opt", "skp", "vis", "crt"]);
        let table =
            ScoreEngine::score(1, &demo_round(), &ballot, &ScoringSystem::default()).unwrap();

        assert_eq!(table.points(&"vis".into()), Some(16));
        assert_eq!(table.points(&"opt".into()), Some(8));
        assert_eq!(table.points(&"skp".into()), Some(9));
        assert_eq!(table.points(&"crt".into()), Some(7));
        assert_eq!(table.voter_count, 4);
    }

    #[test]
    fn test_points_conservation() {
        let names = ["opt", "skp", "vis", "crt"];
        let ballot = roster(&names);
        let systems = [
            vec![1, 1, 1, 1],
            vec![4, 3, 2, 1],
            vec![7, 4, 4, 1],
            vec![100, 10, 1, 1],
        ];

        for points in systems {
            let scoring = ScoringSystem::new(points.clone()).unwrap();
            let per_ballot = scoring.ballot_total(ballot.len()).unwrap();

            // Each voter ranks a different rotation of the ballot, shifted per pass
            for shift in 0..names.len() {
                let votes: Vec<Ranking> = names
                    .iter()
                    .enumerate()
                    .map(|(i, voter)| {
                        let mut order = names.to_vec();
                        order.rotate_left((i + shift) % names.len());
                        vote(voter, &order)
                    })
                    .collect();

                let table = ScoreEngine::score(1, &votes, &ballot, &scoring).unwrap();
                assert_eq!(
                    table.total(),
                    per_ballot * votes.len() as u32,
                    "points {:?}, shift {}",
                    points,
                    shift
                );
            }
        }

        let table =
            ScoreEngine::score(1, &demo_round(), &ballot, &ScoringSystem::default()).unwrap();
        assert_eq!(table.total(), 4 * (4 + 3 + 2 + 1));
    }

    #[test]
    fn test_overflowing_points_are_rejected() {
        let ballot = roster(&["a", "b"]);
        let scoring = ScoringSystem::new(vec![3_000_000_000, 1]).unwrap();
        let votes = vec![vote("a", &["a", "b"]), vote("b", &["a", "b"])];

        let err = ScoreEngine::score(1, &votes, &ballot, &scoring).unwrap_err();
        assert_eq!(
            err,
            ScoreError::Overflow {
                voters: 2,
                participants: 2
            }
        );

        // A single ballot still fits
        let table = ScoreEngine::score(1, &votes[..1], &ballot, &scoring).unwrap();
        assert_eq!(table.points(&"a".into()), Some(3_000_000_000));
    }

    #[test]
    fn test_conservation_with_reduced_ballot() {
        // Scoring covers 4 ranks, only 3 remain live: ranks 1..3 are used.
        let ballot = roster(&["a", "b", "c"]);
        let votes = vec![vote("a", &["a", "b", "c"]), vote("c", &["b", "c", "a"])];
        let table = ScoreEngine::score(2, &votes, &ballot, &ScoringSystem::default()).unwrap();
        assert_eq!(table.total(), 2 * (4 + 3 + 2));
    }

    #[test]
    fn test_no_votes_gives_zero_table() {
        let ballot = roster(&["a", "b"]);
        let table = ScoreEngine::score(1, &[], &ballot, &ScoringSystem::default()).unwrap();
        assert_eq!(table.voter_count, 0);
        assert_eq!(table.total(), 0);
        assert_eq!(table.leaders().len(), 2);
    }

    #[test]
    fn test_malformed_ranking_is_mismatch() {
        let ballot = roster(&["a", "b", "c"]);
        let votes = [vote("a", &["a", "b"])];
        let err = ScoreEngine::score(1, &votes, &ballot, &ScoringSystem::default()).unwrap_err();
        assert!(matches!(err, ScoreError::ConfigMismatch(_)));
    }

    #[test]
    fn test_duplicate_voter_is_mismatch() {
        let ballot = roster(&["a", "b"]);
        let votes = vec![vote("a", &["a", "b"]), vote("a", &["b", "a"])];
        assert!(ScoreEngine::score(1, &votes, &ballot, &ScoringSystem::default()).is_err());
    }

    #[test]
    fn test_uncovered_ballot_is_mismatch() {
        let ballot = roster(&["a", "b", "c"]);
        let scoring = ScoringSystem::new(vec![2, 1]).unwrap();
        assert!(ScoreEngine::score(1, &[], &ballot, &scoring).is_err());
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let ballot = roster(&["a", "b", "c"]);
        let votes = vec![
            vote("a", &["b", "a", "c"]),
            vote("b", &["a", "b", "c"]),
        ];
        let table = ScoreEngine::score(1, &votes, &ballot, &ScoringSystem::default()).unwrap();
        let leaders: Vec<&str> = table.leaders().iter().map(|p| p.as_str()).collect();
        assert_eq!(leaders, vec!["a", "b"]);

        let ranked: Vec<&str> = table.ranked().iter().map(|e| e.participant.as_str()).collect();
        assert_eq!(ranked, vec!["a", "b", "c"]);
    }
}
