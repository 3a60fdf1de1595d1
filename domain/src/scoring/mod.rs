//! Scoring and consensus detection.
//!
//! ```text
//! rankings ──► ScoreEngine::score ──► ScoreTable ──► ConsensusDetector ──► ConsensusCheck
//! ```
//!
//! Both steps are pure functions of their inputs. Score tables are computed
//! fresh for every voting round; the trend across rounds is read back from
//! the ledger.

pub mod consensus;
pub mod score;

pub use consensus::{ConsensusCheck, ConsensusDetector};
pub use score::{ScoreEngine, ScoreEntry, ScoreError, ScoreTable};
