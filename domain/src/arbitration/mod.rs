//! Arbitration domain
//!
//! Once the round loop has terminated, the arbitrator turns the ledger, the
//! final score table, and a judge's ruling into the single [`Verdict`].

pub mod arbitrator;
pub mod verdict;

pub use arbitrator::{ArbitrationError, Arbitrator};
pub use verdict::{JudgeRuling, Verdict};
