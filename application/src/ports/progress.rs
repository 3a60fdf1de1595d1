//! Progress notification port
//!
//! Defines the interface for reporting progress while a debate runs.

use agora_domain::{
    Argument, DebateConfig, Question, Ranking, RoundIssue, RoundRecord, Roster,
    TerminationReason, Verdict,
};

/// Callback for progress updates during a debate
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain text, etc.)
pub trait DebateProgressNotifier: Send + Sync {
    /// Called when a round's argument phase starts
    fn on_round_start(&self, round: usize, speakers: usize);

    /// Called when an argument is committed
    fn on_argument(&self, argument: &Argument);

    /// Called when a round record has been appended to the ledger
    fn on_round_complete(&self, record: &RoundRecord);

    // ==================== Optional Callbacks ====================

    /// Called once before the opening round.
    fn on_debate_start(&self, _question: &Question, _roster: &Roster, _config: &DebateConfig) {}

    /// Called when a round's voting phase starts.
    fn on_voting_start(&self, _round: usize, _voters: usize) {}

    /// Called when a valid ranking has been received.
    fn on_vote(&self, _ranking: &Ranking) {}

    /// Called for each forfeit or disqualification.
    fn on_issue(&self, _round: usize, _issue: &RoundIssue) {}

    /// Called when the round loop ends and the judge is consulted.
    fn on_arbitration_start(&self, _termination: TerminationReason) {}

    /// Called once with the final verdict.
    fn on_verdict(&self, _verdict: &Verdict) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DebateProgressNotifier for NoProgress {
    fn on_round_start(&self, _round: usize, _speakers: usize) {}
    fn on_argument(&self, _argument: &Argument) {}
    fn on_round_complete(&self, _record: &RoundRecord) {}
}
