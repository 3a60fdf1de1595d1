//! Round Controller state machine.
//!
//! ```text
//! Opening ─▶ Arguing(1) ─▶ Voting(1) ─┬─▶ Arguing(i+1)   (i < min, or no consensus and i < max)
//!                                     ├─▶ Converged      (consensus)
//!                                     └─▶ Exhausted      (i == max, or roster collapse)
//! Converged | Exhausted ─▶ Arbitrating ─▶ (Verdict)
//! ```
//!
//! The transitions are pure; the application layer drives them.

use crate::debate::config::DebateConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// Round 0: every participant argues from empty context
    Opening,
    Arguing(usize),
    Voting(usize),
    Converged,
    Exhausted(ExhaustionCause),
    Arbitrating(TerminationReason),
}

impl RoundState {
    /// State after the opening round has been recorded.
    pub fn after_opening() -> Self {
        RoundState::Arguing(1)
    }

    /// State after the argument phase of `round`.
    ///
    /// A ballot of one member (or none) collapses the debate.
    pub fn after_arguing(round: usize, ballot_size: usize) -> Self {
        if ballot_size <= 1 {
            RoundState::Exhausted(ExhaustionCause::RosterCollapse)
        } else {
            RoundState::Voting(round)
        }
    }

    /// State after the voting phase of `round`.
    ///
    /// `consensus` is the detector's answer, or `None` when no check ran.
    /// Before `min_iterations` the answer is ignored.
    pub fn after_voting(round: usize, config: &DebateConfig, consensus: Option<bool>) -> Self {
        if !config.consensus_check_due(round) {
            return RoundState::Arguing(round + 1);
        }
        if consensus == Some(true) {
            RoundState::Converged
        } else if round < config.max_iterations {
            RoundState::Arguing(round + 1)
        } else {
            RoundState::Exhausted(ExhaustionCause::IterationLimit)
        }
    }

    /// `Converged`/`Exhausted` hand off to arbitration unconditionally.
    pub fn into_arbitration(self) -> Option<Self> {
        match self {
            RoundState::Converged => Some(RoundState::Arbitrating(TerminationReason::Converged)),
            RoundState::Exhausted(cause) => {
                Some(RoundState::Arbitrating(TerminationReason::Exhausted(cause)))
            }
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RoundState::Arbitrating(_))
    }

    /// Round index this state belongs to, if any
    pub fn round(&self) -> Option<usize> {
        match self {
            RoundState::Opening => Some(0),
            RoundState::Arguing(i) | RoundState::Voting(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundState::Opening => write!(f, "opening"),
            RoundState::Arguing(i) => write!(f, "arguing({})", i),
            RoundState::Voting(i) => write!(f, "voting({})", i),
            RoundState::Converged => write!(f, "converged"),
            RoundState::Exhausted(cause) => write!(f, "exhausted({})", cause),
            RoundState::Arbitrating(reason) => write!(f, "arbitrating({})", reason),
        }
    }
}

/// Why a debate stopped without consensus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionCause {
    /// `max_iterations` voting rounds completed without consensus
    IterationLimit,
    /// At most one participant was left on the ballot
    RosterCollapse,
}

impl fmt::Display for ExhaustionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExhaustionCause::IterationLimit => write!(f, "iteration limit"),
            ExhaustionCause::RosterCollapse => write!(f, "roster collapse"),
        }
    }
}

/// How the round loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "cause", rename_all = "snake_case")]
pub enum TerminationReason {
    Converged,
    Exhausted(ExhaustionCause),
}

impl TerminationReason {
    pub fn is_converged(&self) -> bool {
        matches!(self, TerminationReason::Converged)
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::Converged => write!(f, "converged"),
            TerminationReason::Exhausted(cause) => write!(f, "exhausted ({})", cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(min: usize, max: usize) -> DebateConfig {
        DebateConfig::default().with_iterations(min, max)
    }

    #[test]
    fn test_opening_advances_to_first_argument_round() {
        assert_eq!(RoundState::after_opening(), RoundState::Arguing(1));
    }

    #[test]
    fn test_no_check_before_min_iterations() {
        let config = config(2, 5);
        // consensus reported but round 1 < min 2: keep arguing
        assert_eq!(
            RoundState::after_voting(1, &config, Some(true)),
            RoundState::Arguing(2)
        );
        assert_eq!(
            RoundState::after_voting(2, &config, Some(true)),
            RoundState::Converged
        );
    }

    #[test]
    fn test_exhaustion_at_max_iterations() {
        let config = config(1, 3);
        assert_eq!(
            RoundState::after_voting(2, &config, Some(false)),
            RoundState::Arguing(3)
        );
        assert_eq!(
            RoundState::after_voting(3, &config, Some(false)),
            RoundState::Exhausted(ExhaustionCause::IterationLimit)
        );
    }

    #[test]
    fn test_missing_check_counts_as_no_consensus() {
        let config = config(1, 1);
        assert_eq!(
            RoundState::after_voting(1, &config, None),
            RoundState::Exhausted(ExhaustionCause::IterationLimit)
        );
    }

    #[test]
    fn test_roster_collapse() {
        assert_eq!(RoundState::after_arguing(2, 4), RoundState::Voting(2));
        assert_eq!(
            RoundState::after_arguing(2, 1),
            RoundState::Exhausted(ExhaustionCause::RosterCollapse)
        );
    }

    #[test]
    fn test_terminal_states_enter_arbitration() {
        assert_eq!(
            RoundState::Converged.into_arbitration(),
            Some(RoundState::Arbitrating(TerminationReason::Converged))
        );
        let exhausted = RoundState::Exhausted(ExhaustionCause::IterationLimit);
        assert!(exhausted.into_arbitration().is_some_and(|s| s.is_terminal()));
        assert_eq!(RoundState::Voting(1).into_arbitration(), None);
    }

    #[test]
    fn test_termination_reason_serde() {
        let json = serde_json::to_string(&TerminationReason::Exhausted(
            ExhaustionCause::RosterCollapse,
        ))
        .unwrap();
        assert_eq!(json, r#"{"kind":"exhausted","cause":"roster_collapse"}"#);
        let back: TerminationReason = serde_json::from_str(r#"{"kind":"converged"}"#).unwrap();
        assert!(back.is_converged());
    }
}
