//! Run Debate use case
//!
//! The round controller. Drives every participant through the opening
//! round, then alternating argument and voting phases, until the debate
//! converges or is exhausted, and finally hands the ledger to the judge and
//! the arbitrator.
//!
//! ```text
//! Opening ─▶ Arguing(1) ─▶ Voting(1) ─▶ … ─▶ Converged | Exhausted ─▶ Arbitrating ─▶ Verdict
//! ```
//!
//! The ledger is owned here and is the only mutable shared state. Every
//! capability call gets a shared borrow of it; nothing else writes to it.

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::judge::{ArbitrationRequest, Judge};
use crate::ports::participant::{ArgumentRequest, CapabilityError, Participant, RankingRequest};
use crate::ports::progress::{DebateProgressNotifier, NoProgress};
use agora_domain::{
    ArbitrationError, Arbitrator, Argument, CallKind, ConfigError, ConsensusDetector,
    DebateConfig, ExhaustionCause, JudgeRuling, Ledger, LedgerError, ParticipantId, Question,
    Ranking, RoundIssue, RoundRecord, RoundState, Roster, ScoreEngine, ScoreError, ScoreTable,
    TerminationReason, Verdict,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that end a debate without a verdict
#[derive(Error, Debug)]
pub enum RunDebateError {
    #[error("Invalid debate configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Arbitration(#[from] ArbitrationError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Scoring error: {0}")]
    Score(#[from] ScoreError),

    #[error("Round controller reached an invalid state: {0}")]
    InvalidState(String),

    #[error("Debate cancelled")]
    Cancelled,
}

/// Input for the RunDebate use case
#[derive(Debug, Clone)]
pub struct RunDebateInput {
    pub question: Question,
    pub config: DebateConfig,
    pub execution: ExecutionParams,
}

impl RunDebateInput {
    pub fn new(question: Question, config: DebateConfig) -> Self {
        Self {
            question,
            config,
            execution: ExecutionParams::default(),
        }
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }
}

/// Everything a caller gets back from a finished debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateOutcome {
    pub ledger: Ledger,
    pub verdict: Verdict,
    /// Score table of the last voting round, if any round was voted on
    pub final_scores: Option<ScoreTable>,
}

impl DebateOutcome {
    /// Per-round score tables in round order.
    pub fn score_trend(&self) -> Vec<&ScoreTable> {
        self.ledger.score_trend()
    }

    /// True when a forfeit or disqualification happened in any round.
    pub fn is_degraded(&self) -> bool {
        self.ledger.has_degraded_rounds()
    }
}

/// Arguments of a round waiting for its voting phase
struct PendingRound {
    round: usize,
    ballot: Roster,
    arguments: Vec<Argument>,
    issues: Vec<RoundIssue>,
}

/// A call that kept failing
struct CallFailure {
    attempts: usize,
    error: CapabilityError,
}

/// Use case for running a debate to a verdict
pub struct RunDebateUseCase {
    participants: Vec<Arc<dyn Participant>>,
    judge: Arc<dyn Judge>,
    logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl RunDebateUseCase {
    /// Participants are registered in the given order.
    pub fn new(participants: Vec<Arc<dyn Participant>>, judge: Arc<dyn Judge>) -> Self {
        Self {
            participants,
            judge,
            logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunDebateInput) -> Result<DebateOutcome, RunDebateError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDebateInput,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<DebateOutcome, RunDebateError> {
        let roster = Roster::new(self.participants.iter().map(|p| p.id().clone()).collect())?;
        input.config.validate(roster.len())?;

        let RunDebateInput {
            question,
            config,
            execution,
        } = input;

        info!(
            "Starting debate with {} participants (threshold {}, rounds {}..={})",
            roster.len(),
            config.consensus_threshold,
            config.min_iterations,
            config.max_iterations
        );
        progress.on_debate_start(&question, &roster, &config);
        self.logger.log(ConversationEvent::debate_start(&question, &roster, &config));

        let mut ledger = Ledger::new(question, roster);
        let mut state = RoundState::Opening;
        let mut pending: Option<PendingRound> = None;

        let termination = loop {
            self.check_cancelled()?;
            debug!(state = %state, "round controller");

            state = match state {
                RoundState::Opening => {
                    let round = self.argument_phase(0, &ledger, &execution, progress).await;
                    let collapsed = round.ballot.len() <= 1;
                    self.append(&mut ledger, Self::arguments_only(round), progress)?;
                    if collapsed {
                        RoundState::Exhausted(ExhaustionCause::RosterCollapse)
                    } else {
                        RoundState::after_opening()
                    }
                }
                RoundState::Arguing(i) => {
                    let round = self.argument_phase(i, &ledger, &execution, progress).await;
                    let next = RoundState::after_arguing(i, round.ballot.len());
                    if matches!(next, RoundState::Voting(_)) {
                        pending = Some(round);
                    } else {
                        warn!(
                            "Round {}: only {} participant(s) left on the ballot, ending debate",
                            i,
                            round.ballot.len()
                        );
                        self.append(&mut ledger, Self::arguments_only(round), progress)?;
                    }
                    next
                }
                RoundState::Voting(i) => {
                    let round = pending
                        .take()
                        .filter(|p| p.round == i)
                        .ok_or_else(|| {
                            RunDebateError::InvalidState(format!(
                                "voting in round {} without its arguments",
                                i
                            ))
                        })?;
                    let record = self
                        .voting_phase(round, &ledger, &config, &execution, progress)
                        .await?;
                    let consensus = record.consensus.as_ref().map(|c| c.reached);
                    self.append(&mut ledger, record, progress)?;
                    RoundState::after_voting(i, &config, consensus)
                }
                RoundState::Converged | RoundState::Exhausted(_) => {
                    state.into_arbitration().ok_or_else(|| {
                        RunDebateError::InvalidState(format!("{} cannot be arbitrated", state))
                    })?
                }
                RoundState::Arbitrating(reason) => break reason,
            };
        };

        info!(
            "Debate ended after {} voting round(s): {}",
            ledger.voting_rounds(),
            termination
        );

        let final_scores = ledger.latest_scores().cloned();
        let verdict = self
            .arbitrate(&ledger, final_scores.as_ref(), termination, &config, &execution, progress)
            .await?;

        Ok(DebateOutcome {
            ledger,
            verdict,
            final_scores,
        })
    }

    // ==================== Phases ====================

    /// Collect one argument from every registered participant.
    async fn argument_phase(
        &self,
        round: usize,
        ledger: &Ledger,
        execution: &ExecutionParams,
        progress: &dyn DebateProgressNotifier,
    ) -> PendingRound {
        let roster = ledger.roster();
        let order = execution.speaking_order.arrange(roster.members(), round);
        info!("Round {}: argument phase ({} speakers)", round, order.len());
        progress.on_round_start(round, order.len());
        self.logger.log(ConversationEvent::round_start(round, &order));

        let question = ledger.question();
        let mut arguments: Vec<Argument> = Vec::with_capacity(order.len());
        let mut issues = Vec::new();

        if execution.visibility.is_concurrent() {
            let calls = order.iter().map(|id| async move {
                let request = ArgumentRequest {
                    question,
                    round,
                    history: ledger,
                    same_round: &[],
                };
                let result = match self.participant(roster, id) {
                    Some(p) => {
                        self.call_with_retry(execution, id.as_str(), "argument", move || {
                            p.produce_argument(request)
                        })
                        .await
                    }
                    None => Err(Self::unregistered(id)),
                };
                (*id, result)
            });

            for (id, result) in join_all(calls).await {
                match result {
                    Ok(text) => {
                        let argument = Argument::new(id.clone(), round, text);
                        self.commit_argument(&argument, progress);
                        arguments.push(argument);
                    }
                    Err(failure) => {
                        issues.push(self.forfeit(round, id, CallKind::Argument, failure, progress))
                    }
                }
            }
        } else {
            for id in &order {
                let visible: &[Argument] = if round == 0 { &[] } else { &arguments };
                let request = ArgumentRequest {
                    question,
                    round,
                    history: ledger,
                    same_round: visible,
                };
                let result = match self.participant(roster, id) {
                    Some(p) => {
                        self.call_with_retry(execution, id.as_str(), "argument", move || {
                            p.produce_argument(request)
                        })
                        .await
                    }
                    None => Err(Self::unregistered(id)),
                };
                match result {
                    Ok(text) => {
                        let argument = Argument::new((*id).clone(), round, text);
                        self.commit_argument(&argument, progress);
                        arguments.push(argument);
                    }
                    Err(failure) => {
                        issues.push(self.forfeit(round, id, CallKind::Argument, failure, progress))
                    }
                }
            }
        }

        // Ballot keeps registration order for tie-breaking.
        let ballot = roster.retain(|m| arguments.iter().any(|a| &a.participant == m));

        PendingRound {
            round,
            ballot,
            arguments,
            issues,
        }
    }

    /// Collect rankings from every ballot member, score them, and check
    /// consensus when due.
    async fn voting_phase(
        &self,
        pending: PendingRound,
        ledger: &Ledger,
        config: &DebateConfig,
        execution: &ExecutionParams,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<RoundRecord, RunDebateError> {
        let PendingRound {
            round,
            ballot,
            arguments,
            mut issues,
        } = pending;

        info!("Round {}: voting phase ({} voters)", round, ballot.len());
        progress.on_voting_start(round, ballot.len());

        let question = ledger.question();
        let roster = ledger.roster();
        let calls = ballot.iter().map(|voter| {
            let request = RankingRequest {
                question,
                round,
                history: ledger,
                arguments: &arguments,
                ballot: &ballot,
            };
            async move {
                let result = match self.participant(roster, voter) {
                    Some(p) => {
                        self.call_with_retry(execution, voter.as_str(), "ranking", move || {
                            p.produce_ranking(request)
                        })
                        .await
                    }
                    None => Err(Self::unregistered(voter)),
                };
                (voter, result)
            }
        });

        let mut votes = Vec::new();
        for (voter, result) in join_all(calls).await {
            match result {
                Ok(draft) => {
                    let ranking = Ranking::new(voter.clone(), round, draft.order, draft.reasoning);
                    match ranking.validate(&ballot) {
                        Ok(()) => {
                            progress.on_vote(&ranking);
                            self.logger.log(ConversationEvent::ranking(&ranking));
                            votes.push(ranking);
                        }
                        Err(violation) => {
                            warn!(
                                "Round {}: disqualifying {}'s ranking: {}",
                                round, voter, violation
                            );
                            let issue = RoundIssue::Disqualified {
                                voter: voter.clone(),
                                violation,
                            };
                            self.record_issue(round, &issue, progress);
                            issues.push(issue);
                        }
                    }
                }
                Err(failure) => {
                    issues.push(self.forfeit(round, voter, CallKind::Ranking, failure, progress))
                }
            }
        }

        let scores = ScoreEngine::score(round, &votes, &ballot, &config.scoring_system)?;
        let consensus = config
            .consensus_check_due(round)
            .then(|| ConsensusDetector::evaluate(&scores, config));

        match &consensus {
            Some(check) => info!(
                "Round {}: top score {}/{} (needs {:.1}), consensus {}",
                round,
                check.top_score,
                check.max_attainable,
                check.threshold_score,
                if check.reached { "reached" } else { "not reached" }
            ),
            None => debug!(
                "Round {}: consensus check not due (min_iterations {})",
                round, config.min_iterations
            ),
        }

        self.logger.log(ConversationEvent::scores(&scores, consensus.as_ref()));

        Ok(RoundRecord {
            round,
            ballot,
            arguments,
            votes: Some(votes),
            scores: Some(scores),
            consensus,
            issues,
        })
    }

    /// Consult the judge and enforce the arbitration contract.
    async fn arbitrate(
        &self,
        ledger: &Ledger,
        final_scores: Option<&ScoreTable>,
        termination: TerminationReason,
        config: &DebateConfig,
        execution: &ExecutionParams,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<Verdict, RunDebateError> {
        progress.on_arbitration_start(termination);

        let default_winner = Arbitrator::default_winner(ledger, final_scores, termination)
            .ok_or(ArbitrationError::NoCandidate)?;

        let request = ArbitrationRequest {
            ledger,
            final_scores,
            termination,
            default_winner: &default_winner,
            may_override: config.judge_may_override,
        };
        info!(
            "Arbitration by '{}' (default winner: {})",
            self.judge.name(),
            default_winner
        );

        let ruling = match self
            .call_with_retry(execution, self.judge.name(), "ruling", move || {
                self.judge.deliberate(request)
            })
            .await
        {
            Ok(ruling) => ruling,
            Err(failure) => {
                warn!(
                    "Judge '{}' failed after {} attempt(s), confirming score outcome: {}",
                    self.judge.name(),
                    failure.attempts,
                    failure.error
                );
                JudgeRuling::confirm()
            }
        };

        let verdict = Arbitrator::adjudicate(ledger, final_scores, termination, config, ruling)
            .inspect_err(|e| warn!("Arbitration failed: {}", e))?;

        info!(
            "Verdict: {} wins ({}{})",
            verdict.winner,
            if verdict.consensus_reached {
                "consensus"
            } else {
                "no consensus"
            },
            if verdict.overridden { ", overridden" } else { "" }
        );
        progress.on_verdict(&verdict);
        self.logger.log(ConversationEvent::verdict(&verdict));
        Ok(verdict)
    }

    // ==================== Helpers ====================

    /// Call `f` until it succeeds, fails permanently, or runs out of attempts.
    async fn call_with_retry<T, F, Fut>(
        &self,
        execution: &ExecutionParams,
        who: &str,
        what: &str,
        f: F,
    ) -> Result<T, CallFailure>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, CapabilityError>>,
    {
        let max_attempts = execution.attempts();
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = match execution.call_timeout {
                Some(limit) => match tokio::time::timeout(limit, f()).await {
                    Ok(result) => result,
                    Err(_) => Err(CapabilityError::Transient(format!(
                        "no reply within {:?}",
                        limit
                    ))),
                },
                None => f().await,
            };

            match result {
                Ok(value) => return Ok(value),
                Err(error) if error.is_transient() && attempt < max_attempts => {
                    let delay = execution.backoff_for(attempt);
                    debug!(
                        "{} {} attempt {}/{} failed, retrying in {:?}: {}",
                        who, what, attempt, max_attempts, delay, error
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => {
                    return Err(CallFailure {
                        attempts: attempt,
                        error,
                    });
                }
            }
        }
    }

    fn participant(&self, roster: &Roster, id: &ParticipantId) -> Option<&Arc<dyn Participant>> {
        roster.position(id).and_then(|i| self.participants.get(i))
    }

    fn unregistered(id: &ParticipantId) -> CallFailure {
        CallFailure {
            attempts: 0,
            error: CapabilityError::Permanent(format!("'{}' is not registered", id)),
        }
    }

    fn commit_argument(&self, argument: &Argument, progress: &dyn DebateProgressNotifier) {
        debug!(
            "Round {}: {} argued ({} words)",
            argument.round,
            argument.participant,
            argument.word_count()
        );
        progress.on_argument(argument);
        self.logger.log(ConversationEvent::argument(argument));
    }

    fn forfeit(
        &self,
        round: usize,
        id: &ParticipantId,
        call: CallKind,
        failure: CallFailure,
        progress: &dyn DebateProgressNotifier,
    ) -> RoundIssue {
        warn!(
            "Round {}: {} forfeits its {} after {} attempt(s): {}",
            round, id, call, failure.attempts, failure.error
        );
        let issue = RoundIssue::Forfeit {
            participant: id.clone(),
            call,
            attempts: failure.attempts,
            reason: failure.error.to_string(),
        };
        self.record_issue(round, &issue, progress);
        issue
    }

    fn record_issue(
        &self,
        round: usize,
        issue: &RoundIssue,
        progress: &dyn DebateProgressNotifier,
    ) {
        progress.on_issue(round, issue);
        self.logger.log(ConversationEvent::issue(round, issue));
    }

    fn arguments_only(round: PendingRound) -> RoundRecord {
        RoundRecord::arguments_only(round.round, round.ballot, round.arguments, round.issues)
    }

    fn append(
        &self,
        ledger: &mut Ledger,
        record: RoundRecord,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<(), RunDebateError> {
        ledger.append(record)?;
        if let Some(record) = ledger.last() {
            progress.on_round_complete(record);
        }
        Ok(())
    }

    fn check_cancelled(&self) -> Result<(), RunDebateError> {
        match &self.cancellation_token {
            Some(token) if token.is_cancelled() => Err(RunDebateError::Cancelled),
            _ => Ok(()),
        }
    }
}
