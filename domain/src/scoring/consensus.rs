//! Consensus Detector
//!
//! Decides from a [`ScoreTable`] whether the debate has converged.
//!
//! ```text
//! max_attainable = voter_count × points(rank 1)
//! consensus      ⇔ top_score ≥ threshold × max_attainable
//! ```
//!
//! A tie at a consensus-clearing top score still counts as consensus. All
//! tied leaders are reported; picking between them is the arbitrator's job.

use crate::core::participant::ParticipantId;
use crate::debate::config::DebateConfig;
use crate::scoring::score::ScoreTable;
use serde::{Deserialize, Serialize};

/// Absorbs float representation error in `threshold × max_attainable`.
const THRESHOLD_EPSILON: f64 = 1e-9;

/// Detailed outcome of a consensus check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusCheck {
    pub reached: bool,
    pub top_score: u32,
    pub max_attainable: u32,
    pub threshold_score: f64,
    /// Participants sharing the top score, registration order
    pub leaders: Vec<ParticipantId>,
}

impl ConsensusCheck {
    /// Points the leader still needs (0 once reached).
    pub fn points_needed(&self) -> u32 {
        let gap = self.threshold_score - f64::from(self.top_score);
        if gap <= THRESHOLD_EPSILON {
            0
        } else {
            gap.ceil() as u32
        }
    }

    pub fn is_tied(&self) -> bool {
        self.leaders.len() > 1
    }
}

/// Stateless consensus detector
pub struct ConsensusDetector;

impl ConsensusDetector {
    /// Whether `scores` clears the configured threshold.
    ///
    /// # Example
    ///
    /// ```
    /// use agora_domain::{ConsensusDetector, DebateConfig, ScoreEntry, ScoreTable};
    ///
    /// // 4 voters, {4,3,2,1}, threshold 0.75 → 12 of 16 needed
    /// let table = ScoreTable {
    ///     round: 2,
    ///     voter_count: 4,
    ///     entries: vec![
    ///         ScoreEntry { participant: "a".into(), points: 12 },
    ///         ScoreEntry { participant: "b".into(), points: 11 },
    ///         ScoreEntry { participant: "c".into(), points: 10 },
    ///         ScoreEntry { participant: "d".into(), points: 7 },
    ///     ],
    /// };
    /// assert!(ConsensusDetector::check(&table, &DebateConfig::default()));
    /// ```
    pub fn check(scores: &ScoreTable, config: &DebateConfig) -> bool {
        Self::evaluate(scores, config).reached
    }

    /// Full consensus evaluation for reporting.
    pub fn evaluate(scores: &ScoreTable, config: &DebateConfig) -> ConsensusCheck {
        let top = config.scoring_system.top();
        // Saturates for tables the score engine would have refused
        let max_attainable = u32::try_from(scores.voter_count)
            .ok()
            .and_then(|voters| voters.checked_mul(top))
            .unwrap_or(u32::MAX);
        let threshold_score =
            config.consensus_threshold * scores.voter_count as f64 * f64::from(top);
        let top_score = scores.top_score();
        let reached = scores.voter_count > 0
            && f64::from(top_score) + THRESHOLD_EPSILON >= threshold_score;

        ConsensusCheck {
            reached,
            top_score,
            max_attainable,
            threshold_score,
            leaders: scores.leaders().into_iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::config::ScoringSystem;
    use crate::scoring::score::ScoreEntry;

    fn table(voters: usize, points: &[(&str, u32)]) -> ScoreTable {
        ScoreTable {
            round: 1,
            voter_count: voters,
            entries: points
                .iter()
                .map(|(p, s)| ScoreEntry {
                    participant: (*p).into(),
                    points: *s,
                })
                .collect(),
        }
    }

    #[test]
    fn test_worked_example_threshold_twelve_of_sixteen() {
        let config = DebateConfig::default();
        let below = table(4, &[("a", 11), ("b", 11), ("c", 10), ("d", 8)]);
        let at = table(4, &[("a", 12), ("b", 11), ("c", 10), ("d", 7)]);

        let check = ConsensusDetector::evaluate(&below, &config);
        assert_eq!(check.max_attainable, 16);
        assert_eq!(check.threshold_score, 12.0);
        assert!(!check.reached);
        assert_eq!(check.points_needed(), 1);

        assert!(ConsensusDetector::check(&at, &config));
    }

    #[test]
    fn test_iff_property_over_thresholds() {
        let scores = table(3, &[("a", 9), ("b", 6), ("c", 3)]);
        for step in 1..=100 {
            let threshold = step as f64 / 100.0;
            let config = DebateConfig::default().with_threshold(threshold);
            let expected = 9.0 >= threshold * 12.0 - 1e-9;
            assert_eq!(
                ConsensusDetector::check(&scores, &config),
                expected,
                "threshold {threshold}"
            );
        }
    }

    #[test]
    fn test_all_tied_scores() {
        // 4 voters each ranking differently: everyone ends with 10
        let scores = table(4, &[("a", 10), ("b", 10), ("c", 10), ("d", 10)]);
        let low = DebateConfig::default().with_threshold(0.5);
        let check = ConsensusDetector::evaluate(&scores, &low);
        assert!(check.reached);
        assert!(check.is_tied());
        assert_eq!(check.leaders.len(), 4);

        assert!(!ConsensusDetector::check(&scores, &DebateConfig::default()));
    }

    #[test]
    fn test_tie_at_top_is_consensus_positive() {
        let scores = table(2, &[("a", 7), ("b", 7), ("c", 4)]);
        let config = DebateConfig::default().with_threshold(0.8);
        let check = ConsensusDetector::evaluate(&scores, &config);
        assert!(check.reached);
        let leaders: Vec<&str> = check.leaders.iter().map(|p| p.as_str()).collect();
        assert_eq!(leaders, vec!["a", "b"]);
    }

    #[test]
    fn test_single_voter_recomputes_max() {
        let scores = table(1, &[("a", 4), ("b", 3), ("c", 2), ("d", 1)]);
        let check = ConsensusDetector::evaluate(&scores, &DebateConfig::default());
        assert_eq!(check.max_attainable, 4);
        assert!(check.reached);
    }

    #[test]
    fn test_zero_voters_never_converge() {
        let scores = table(0, &[("a", 0), ("b", 0)]);
        assert!(!ConsensusDetector::check(&scores, &DebateConfig::default()));
    }

    #[test]
    fn test_full_threshold_requires_unanimity() {
        let config = DebateConfig::default().with_threshold(1.0);
        assert!(ConsensusDetector::check(&table(2, &[("a", 8), ("b", 6)]), &config));
        assert!(!ConsensusDetector::check(&table(2, &[("a", 7), ("b", 7)]), &config));
    }

    #[test]
    fn test_large_points_do_not_overflow() {
        let scoring = ScoringSystem::new(vec![3_000_000_000, 1]).unwrap();
        let config = DebateConfig::default().with_scoring_system(scoring);

        let check = ConsensusDetector::evaluate(&table(3, &[("a", u32::MAX), ("b", 3)]), &config);
        assert_eq!(check.max_attainable, u32::MAX);
        assert_eq!(check.threshold_score, 0.75 * 9_000_000_000.0);
        assert!(!check.reached);

        let single = table(1, &[("a", 3_000_000_000), ("b", 1)]);
        let check = ConsensusDetector::evaluate(&single, &config);
        assert_eq!(check.max_attainable, 3_000_000_000);
        assert!(check.reached);
    }
}
