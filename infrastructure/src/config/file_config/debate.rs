//! Debate rules from TOML (`[debate]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [debate]
//! consensus_threshold = 0.75
//! min_iterations = 2
//! max_iterations = 10
//! scoring_system = [4, 3, 2, 1]
//! ```
//!
//! The scoring system may also be written as a rank table:
//!
//! ```toml
//! [debate.scoring_system]
//! 1 = 4
//! 2 = 3
//! 3 = 2
//! 4 = 1
//! ```

use agora_domain::{ConfigError, DebateConfig, ScoringSystem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Points per rank, as a list (best first) or a rank table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileScoringSystem {
    Points(Vec<u32>),
    RankTable(BTreeMap<String, u32>),
}

impl Default for FileScoringSystem {
    fn default() -> Self {
        FileScoringSystem::Points(ScoringSystem::default().into())
    }
}

impl FileScoringSystem {
    pub fn to_scoring_system(&self) -> Result<ScoringSystem, ConfigError> {
        match self {
            FileScoringSystem::Points(points) => ScoringSystem::new(points.clone()),
            FileScoringSystem::RankTable(table) => {
                let mut ranks = BTreeMap::new();
                for (rank, points) in table {
                    let rank: usize = rank.trim().parse().map_err(|_| {
                        ConfigError::ScoringSystem(format!("'{}' is not a rank number", rank))
                    })?;
                    ranks.insert(rank, *points);
                }
                ScoringSystem::from_rank_map(&ranks)
            }
        }
    }
}

/// Raw debate rules from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    /// Fraction of the maximum attainable score the leader needs
    pub consensus_threshold: f64,
    /// Voting rounds before consensus is first checked
    pub min_iterations: usize,
    /// Hard limit on voting rounds
    pub max_iterations: usize,
    pub scoring_system: FileScoringSystem,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        let defaults = DebateConfig::default();
        Self {
            consensus_threshold: defaults.consensus_threshold,
            min_iterations: defaults.min_iterations,
            max_iterations: defaults.max_iterations,
            scoring_system: FileScoringSystem::default(),
        }
    }
}

impl FileDebateConfig {
    /// Build the domain rules. The override gate lives in `[judge]`.
    ///
    /// Only the shape of the scoring system is checked here; coverage of
    /// the roster is checked when the debate starts.
    pub fn to_debate_config(&self, judge_may_override: bool) -> Result<DebateConfig, ConfigError> {
        Ok(DebateConfig::default()
            .with_scoring_system(self.scoring_system.to_scoring_system()?)
            .with_threshold(self.consensus_threshold)
            .with_iterations(self.min_iterations, self.max_iterations)
            .with_override(judge_may_override))
    }
}
