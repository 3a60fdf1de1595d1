//! Debate configuration: scoring system, consensus threshold and iteration
//! bounds.
//!
//! A [`DebateConfig`] is validated once, against the registered roster, when
//! a debate is constructed. It is immutable afterwards.

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rank → points mapping.
///
/// Index 0 holds the points for rank 1. Points are strictly positive and
/// non-increasing as the rank grows.
///
/// # Example
///
/// ```
/// use agora_domain::ScoringSystem;
///
/// let scoring = ScoringSystem::new(vec![4, 3, 2, 1]).unwrap();
/// assert_eq!(scoring.points_for(1), Some(4));
/// assert_eq!(scoring.points_for(4), Some(1));
/// assert_eq!(scoring.points_for(5), None);
/// assert!(ScoringSystem::new(vec![1, 2]).is_err()); // increasing
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct ScoringSystem {
    points: Vec<u32>,
}

impl ScoringSystem {
    pub fn new(points: Vec<u32>) -> Result<Self, ConfigError> {
        if points.is_empty() {
            return Err(ConfigError::ScoringSystem(
                "scoring system cannot be empty".to_string(),
            ));
        }
        if let Some(rank) = points.iter().position(|p| *p == 0) {
            return Err(ConfigError::ScoringSystem(format!(
                "points for rank {} must be positive",
                rank + 1
            )));
        }
        if let Some(i) = points.windows(2).position(|w| w[1] > w[0]) {
            return Err(ConfigError::ScoringSystem(format!(
                "points must not increase with rank (rank {} = {}, rank {} = {})",
                i + 1,
                points[i],
                i + 2,
                points[i + 1]
            )));
        }
        Ok(Self { points })
    }

    /// Build from an explicit `rank → points` map; ranks must run 1..=N.
    pub fn from_rank_map(map: &BTreeMap<usize, u32>) -> Result<Self, ConfigError> {
        for (expected, rank) in (1..).zip(map.keys()) {
            if *rank != expected {
                return Err(ConfigError::ScoringSystem(format!(
                    "ranks must be contiguous from 1, missing rank {}",
                    expected
                )));
            }
        }
        Self::new(map.values().copied().collect())
    }

    /// Points awarded for a 1-based rank.
    pub fn points_for(&self, rank: usize) -> Option<u32> {
        rank.checked_sub(1).and_then(|i| self.points.get(i)).copied()
    }

    /// Points for rank 1.
    pub fn top(&self) -> u32 {
        self.points[0]
    }

    /// Number of ranks covered.
    pub fn ranks(&self) -> usize {
        self.points.len()
    }

    pub fn covers(&self, participants: usize) -> bool {
        participants <= self.points.len()
    }

    /// Points handed out by one complete ranking of `participants` entries.
    ///
    /// `None` when the sum does not fit in `u32`.
    pub fn ballot_total(&self, participants: usize) -> Option<u32> {
        self.points
            .iter()
            .take(participants)
            .try_fold(0u32, |acc, p| acc.checked_add(*p))
    }

    /// Points handed out in a round where all `participants` rank each other.
    ///
    /// Bounds every score total of such a round; `None` on `u32` overflow.
    pub fn round_total(&self, participants: usize) -> Option<u32> {
        let voters = u32::try_from(participants).ok()?;
        self.ballot_total(participants)?.checked_mul(voters)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.points
    }
}

impl Default for ScoringSystem {
    fn default() -> Self {
        Self {
            points: vec![4, 3, 2, 1],
        }
    }
}

impl TryFrom<Vec<u32>> for ScoringSystem {
    type Error = ConfigError;

    fn try_from(points: Vec<u32>) -> Result<Self, Self::Error> {
        ScoringSystem::new(points)
    }
}

impl From<ScoringSystem> for Vec<u32> {
    fn from(scoring: ScoringSystem) -> Self {
        scoring.points
    }
}

/// Debate-wide rules supplied once at debate start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateConfig {
    /// Rank → points mapping.
    pub scoring_system: ScoringSystem,
    /// Fraction of the maximum attainable score the leader must reach.
    pub consensus_threshold: f64,
    /// Voting rounds that must complete before consensus is checked.
    pub min_iterations: usize,
    /// Hard limit on voting rounds.
    pub max_iterations: usize,
    /// Whether the arbitrator may overrule the scored outcome.
    pub judge_may_override: bool,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            scoring_system: ScoringSystem::default(),
            consensus_threshold: 0.75,
            min_iterations: 2,
            max_iterations: 10,
            judge_may_override: true,
        }
    }
}

impl DebateConfig {
    // ==================== Builder Methods ====================

    pub fn with_scoring_system(mut self, scoring: ScoringSystem) -> Self {
        self.scoring_system = scoring;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.consensus_threshold = threshold;
        self
    }

    pub fn with_iterations(mut self, min: usize, max: usize) -> Self {
        self.min_iterations = min;
        self.max_iterations = max;
        self
    }

    pub fn with_override(mut self, allowed: bool) -> Self {
        self.judge_may_override = allowed;
        self
    }

    // ==================== Validation ====================

    /// Validate against a roster of `participants` registered members.
    pub fn validate(&self, participants: usize) -> Result<(), ConfigError> {
        let t = self.consensus_threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(ConfigError::Threshold(t));
        }
        if self.min_iterations < 1 || self.max_iterations < self.min_iterations {
            return Err(ConfigError::IterationBounds {
                min: self.min_iterations,
                max: self.max_iterations,
            });
        }
        if !self.scoring_system.covers(participants) {
            return Err(ConfigError::RankCoverage {
                covered: self.scoring_system.ranks(),
                participants,
            });
        }
        if self.scoring_system.round_total(participants).is_none() {
            return Err(ConfigError::PointOverflow { participants });
        }
        Ok(())
    }

    /// Whether the consensus detector may run after voting round `round`.
    ///
    /// Round 0 carries no votes and never qualifies.
    pub fn consensus_check_due(&self, round: usize) -> bool {
        round >= 1 && round >= self.min_iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_four_player_scheme() {
        let config = DebateConfig::default();
        assert_eq!(config.scoring_system.as_slice(), &[4, 3, 2, 1]);
        assert_eq!(config.consensus_threshold, 0.75);
        assert_eq!(config.min_iterations, 2);
        assert_eq!(config.max_iterations, 10);
        assert!(config.judge_may_override);
        assert!(config.validate(4).is_ok());
    }

    #[test]
    fn test_scoring_rejects_zero_points() {
        let err = ScoringSystem::new(vec![3, 0]).unwrap_err();
        assert!(err.to_string().contains("rank 2 must be positive"));
    }

    #[test]
    fn test_scoring_allows_flat_points() {
        assert!(ScoringSystem::new(vec![1, 1, 1]).is_ok());
    }

    #[test]
    fn test_from_rank_map() {
        let map: BTreeMap<usize, u32> = [(1, 5), (2, 3), (3, 1)].into_iter().collect();
        let scoring = ScoringSystem::from_rank_map(&map).unwrap();
        assert_eq!(scoring.as_slice(), &[5, 3, 1]);

        let gap: BTreeMap<usize, u32> = [(1, 5), (3, 1)].into_iter().collect();
        assert!(ScoringSystem::from_rank_map(&gap).is_err());
    }

    #[test]
    fn test_ballot_total_truncates_to_live_roster() {
        let scoring = ScoringSystem::default();
        assert_eq!(scoring.ballot_total(4), Some(10));
        assert_eq!(scoring.ballot_total(2), Some(7));
    }

    #[test]
    fn test_validate_threshold_range() {
        assert!(DebateConfig::default().with_threshold(0.0).validate(4).is_err());
        assert!(DebateConfig::default().with_threshold(1.0).validate(4).is_ok());
        assert!(DebateConfig::default().with_threshold(1.01).validate(4).is_err());
        assert!(
            DebateConfig::default()
                .with_threshold(f64::NAN)
                .validate(4)
                .is_err()
        );
    }

    #[test]
    fn test_validate_iteration_bounds() {
        assert!(DebateConfig::default().with_iterations(0, 3).validate(4).is_err());
        assert!(DebateConfig::default().with_iterations(4, 3).validate(4).is_err());
        assert!(DebateConfig::default().with_iterations(3, 3).validate(4).is_ok());
    }

    #[test]
    fn test_validate_rank_coverage() {
        let err = DebateConfig::default().validate(5).unwrap_err();
        assert_eq!(
            err,
            ConfigError::RankCoverage {
                covered: 4,
                participants: 5
            }
        );
    }

    #[test]
    fn test_validate_rejects_overflowing_points() {
        let scoring = ScoringSystem::new(vec![3_000_000_000, 1]).unwrap();
        let config = DebateConfig::default().with_scoring_system(scoring);
        assert_eq!(
            config.validate(2).unwrap_err(),
            ConfigError::PointOverflow { participants: 2 }
        );

        // Two ballots of 2^31 - 1 points still fit
        let edge = ScoringSystem::new(vec![u32::MAX / 2 - 1, 1]).unwrap();
        assert!(DebateConfig::default().with_scoring_system(edge).validate(2).is_ok());
        assert_eq!(ScoringSystem::new(vec![u32::MAX, 1]).unwrap().round_total(2), None);
    }

    #[test]
    fn test_consensus_check_due() {
        let config = DebateConfig::default().with_iterations(2, 5);
        assert!(!config.consensus_check_due(0));
        assert!(!config.consensus_check_due(1));
        assert!(config.consensus_check_due(2));

        let eager = DebateConfig::default().with_iterations(1, 5);
        assert!(!eager.consensus_check_due(0));
        assert!(eager.consensus_check_due(1));
    }

    #[test]
    fn test_scoring_serde_round_trip_rejects_invalid() {
        let ok: ScoringSystem = serde_json::from_str("[5, 2, 1]").unwrap();
        assert_eq!(ok.top(), 5);
        assert!(serde_json::from_str::<ScoringSystem>("[1, 5]").is_err());
    }
}
