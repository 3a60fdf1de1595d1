//! Domain error types

use thiserror::Error;

/// Invalid debate configuration.
///
/// Always fatal and always raised at debate construction; a running debate
/// never re-validates its configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid scoring system: {0}")]
    ScoringSystem(String),

    #[error("Consensus threshold must be in (0, 1], got {0}")]
    Threshold(f64),

    #[error("Invalid iteration bounds: min_iterations={min}, max_iterations={max}")]
    IterationBounds { min: usize, max: usize },

    #[error("Scoring system covers {covered} ranks but the roster has {participants} participants")]
    RankCoverage { covered: usize, participants: usize },

    #[error("Scoring system points overflow when {participants} participants all vote")]
    PointOverflow { participants: usize },

    #[error("Invalid roster: {0}")]
    Roster(String),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),
}
