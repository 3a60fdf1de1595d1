//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording debate events
//! (arguments, rankings, forfeits, score tables, the verdict) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! debate transcript in a machine-readable format (JSONL).
//!
//! Every event carries the [`DebatePhase`] it belongs to and, for events
//! inside a round, the round number, so a transcript can be grouped without
//! inspecting payloads.

use agora_domain::{
    Argument, CallKind, ConsensusCheck, DebateConfig, ParticipantId, Question, Ranking,
    RoundIssue, Roster, ScoreTable, Verdict,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

/// Part of the debate an event was recorded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DebatePhase {
    /// Question, roster and rules, before any call
    Setup,
    /// Round 0 arguments
    Opening,
    Arguing,
    Voting,
    /// Score table and consensus check that close a round
    Scoring,
    Arbitration,
}

impl DebatePhase {
    /// Argument phase of `round`; round 0 is the opening.
    pub fn arguing(round: usize) -> Self {
        if round == 0 {
            DebatePhase::Opening
        } else {
            DebatePhase::Arguing
        }
    }
}

impl fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DebatePhase::Setup => "setup",
            DebatePhase::Opening => "opening",
            DebatePhase::Arguing => "arguing",
            DebatePhase::Voting => "voting",
            DebatePhase::Scoring => "scoring",
            DebatePhase::Arbitration => "arbitration",
        };
        f.write_str(name)
    }
}

/// A structured conversation event for logging.
///
/// Built through the named constructors so that the type, phase and round
/// always agree. Implementations add the timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEvent {
    /// Event type identifier (e.g., "argument", "ranking", "verdict").
    pub event_type: &'static str,
    pub phase: DebatePhase,
    /// `None` for events outside any round
    pub round: Option<usize>,
    /// Event-specific fields
    pub payload: Value,
}

impl ConversationEvent {
    fn new(
        event_type: &'static str,
        phase: DebatePhase,
        round: Option<usize>,
        payload: Value,
    ) -> Self {
        Self {
            event_type,
            phase,
            round,
            payload,
        }
    }

    /// Transcript header: the question, the registered roster and the rules.
    pub fn debate_start(question: &Question, roster: &Roster, config: &DebateConfig) -> Self {
        Self::new(
            "debate_start",
            DebatePhase::Setup,
            None,
            json!({
                "question": question.content(),
                "participants": roster.members(),
                "config": config,
            }),
        )
    }

    pub fn round_start(round: usize, speaking_order: &[&ParticipantId]) -> Self {
        Self::new(
            "round_start",
            DebatePhase::arguing(round),
            Some(round),
            json!({ "speaking_order": speaking_order }),
        )
    }

    pub fn argument(argument: &Argument) -> Self {
        Self::new(
            "argument",
            DebatePhase::arguing(argument.round),
            Some(argument.round),
            json!({
                "participant": argument.participant,
                "text": argument.text,
            }),
        )
    }

    pub fn ranking(ranking: &Ranking) -> Self {
        Self::new(
            "ranking",
            DebatePhase::Voting,
            Some(ranking.round),
            json!({
                "voter": ranking.voter,
                "order": ranking.order,
                "reasoning": ranking.reasoning,
            }),
        )
    }

    /// A forfeit or a disqualified ranking, filed under the phase it hit.
    pub fn issue(round: usize, issue: &RoundIssue) -> Self {
        let (event_type, phase) = match issue {
            RoundIssue::Forfeit {
                call: CallKind::Argument,
                ..
            } => ("forfeit", DebatePhase::arguing(round)),
            RoundIssue::Forfeit {
                call: CallKind::Ranking,
                ..
            } => ("forfeit", DebatePhase::Voting),
            RoundIssue::Disqualified { .. } => ("disqualified", DebatePhase::Voting),
        };
        Self::new(event_type, phase, Some(round), json!({ "issue": issue }))
    }

    pub fn scores(scores: &ScoreTable, consensus: Option<&ConsensusCheck>) -> Self {
        Self::new(
            "scores",
            DebatePhase::Scoring,
            Some(scores.round),
            json!({
                "scores": scores.entries,
                "voters": scores.voter_count,
                "consensus": consensus,
            }),
        )
    }

    pub fn verdict(verdict: &Verdict) -> Self {
        Self::new(
            "verdict",
            DebatePhase::Arbitration,
            None,
            serde_json::to_value(verdict).unwrap_or_default(),
        )
    }
}

/// Port for logging conversation events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// `log` is synchronous and infallible: a failing log never interrupts a
/// debate.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_domain::RankingViolation;

    #[test]
    fn test_opening_round_is_its_own_phase() {
        let opening = Argument::new("a".into(), 0, "First take");
        let event = ConversationEvent::argument(&opening);
        assert_eq!(event.phase, DebatePhase::Opening);
        assert_eq!(event.round, Some(0));

        let later = Argument::new("a".into(), 3, "Rebuttal");
        assert_eq!(ConversationEvent::argument(&later).phase, DebatePhase::Arguing);
    }

    #[test]
    fn test_issue_phase_follows_the_failed_call() {
        let forfeit = |call| RoundIssue::Forfeit {
            participant: "b".into(),
            call,
            attempts: 3,
            reason: "timeout".into(),
        };

        let event = ConversationEvent::issue(2, &forfeit(CallKind::Argument));
        assert_eq!((event.event_type, event.phase), ("forfeit", DebatePhase::Arguing));

        let event = ConversationEvent::issue(0, &forfeit(CallKind::Argument));
        assert_eq!(event.phase, DebatePhase::Opening);

        let event = ConversationEvent::issue(2, &forfeit(CallKind::Ranking));
        assert_eq!(event.phase, DebatePhase::Voting);

        let disqualified = RoundIssue::Disqualified {
            voter: "c".into(),
            violation: RankingViolation::Missing("a".into()),
        };
        let event = ConversationEvent::issue(2, &disqualified);
        assert_eq!(event.event_type, "disqualified");
        assert_eq!(event.round, Some(2));
        assert_eq!(event.payload["issue"]["voter"], "c");
    }

    #[test]
    fn test_header_has_no_round() {
        let question = Question::try_new("Tabs or spaces?").unwrap();
        let roster = Roster::new(vec!["a".into(), "b".into()]).unwrap();
        let event = ConversationEvent::debate_start(&question, &roster, &DebateConfig::default());

        assert_eq!(event.phase, DebatePhase::Setup);
        assert_eq!(event.round, None);
        assert_eq!(event.payload["participants"][1], "b");
        assert_eq!(event.payload["config"]["consensus_threshold"], 0.75);
    }
}
