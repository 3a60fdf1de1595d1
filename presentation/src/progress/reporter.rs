//! Progress reporting while a debate runs

use agora_application::DebateProgressNotifier;
use agora_domain::{
    Argument, DebateConfig, Question, Ranking, RoundIssue, RoundRecord, Roster,
    TerminationReason, Verdict,
};
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress with one bar per debate phase
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn round_name(round: usize) -> String {
        if round == 0 {
            "Opening".to_string()
        } else {
            format!("Round {}", round)
        }
    }

    fn start_phase(&self, prefix: String, total: usize) {
        let pb = self.multi.add(ProgressBar::new(total as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(prefix);
        pb.set_message("Starting...");

        if let Ok(mut slot) = self.phase_bar.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn tick(&self, message: String) {
        if let Ok(slot) = self.phase_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.set_message(message);
            pb.inc(1);
        }
    }

    fn finish(&self, message: String) {
        if let Ok(mut slot) = self.phase_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(message);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DebateProgressNotifier for ProgressReporter {
    fn on_round_start(&self, round: usize, speakers: usize) {
        self.start_phase(format!("{:<9} arguing", Self::round_name(round)), speakers);
    }

    fn on_argument(&self, argument: &Argument) {
        self.tick(format!("{} {}", "v".green(), argument.participant));
    }

    fn on_round_complete(&self, record: &RoundRecord) {
        let status = match &record.consensus {
            Some(check) if check.reached => "consensus!".green().to_string(),
            Some(check) => format!("{} points short", check.points_needed()),
            None => "complete".to_string(),
        };
        self.finish(format!("{} {}", Self::round_name(record.round), status));
    }

    fn on_voting_start(&self, round: usize, voters: usize) {
        self.start_phase(format!("{:<9} voting ", Self::round_name(round)), voters);
    }

    fn on_vote(&self, ranking: &Ranking) {
        self.tick(format!("{} {}", "v".green(), ranking.voter));
    }

    fn on_issue(&self, _round: usize, issue: &RoundIssue) {
        self.tick(format!("{} {}", "x".red(), issue.participant()));
    }

    fn on_arbitration_start(&self, termination: TerminationReason) {
        self.finish(String::new());
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_message(format!("Judge reviewing ({})...", termination));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        if let Ok(mut slot) = self.phase_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_verdict(&self, verdict: &Verdict) {
        self.finish(format!("Winner: {}", verdict.winner.to_string().green().bold()));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl DebateProgressNotifier for SimpleProgress {
    fn on_debate_start(&self, _question: &Question, roster: &Roster, config: &DebateConfig) {
        println!(
            "{} {} participants, {:.0}% of attainable points, {}-{} rounds",
            "Rules:".cyan().bold(),
            roster.len(),
            config.consensus_threshold * 100.0,
            config.min_iterations,
            config.max_iterations
        );
        println!();
    }

    fn on_round_start(&self, round: usize, speakers: usize) {
        println!(
            "{} {} ({} speakers)",
            "->".cyan(),
            ProgressReporter::round_name(round).bold(),
            speakers
        );
    }

    fn on_argument(&self, argument: &Argument) {
        println!("  {} {}", "v".green(), argument.participant);
    }

    fn on_voting_start(&self, _round: usize, voters: usize) {
        println!("  {} voting ({} voters)", "->".cyan(), voters);
    }

    fn on_issue(&self, _round: usize, issue: &RoundIssue) {
        println!("  {} {}", "x".red(), issue);
    }

    fn on_round_complete(&self, record: &RoundRecord) {
        if let Some(check) = &record.consensus {
            if check.reached {
                println!("  {}", "Consensus reached".green());
            } else {
                println!(
                    "  leader at {}/{} points, {} more needed",
                    check.top_score,
                    check.max_attainable,
                    check.points_needed()
                );
            }
        }
        println!();
    }

    fn on_arbitration_start(&self, termination: TerminationReason) {
        println!("{} Judge reviewing ({})", "->".cyan(), termination);
    }
}
