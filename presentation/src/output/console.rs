//! Console output formatter for debate results

use crate::output::formatter::OutputFormatter;
use agora_application::DebateOutcome;
use agora_domain::{ConsensusCheck, Ledger, RoundRecord, ScoreTable, Verdict};
use colored::Colorize;

const BAR_WIDTH: usize = 20;

/// Formats debate outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete debate: every round, the score trend and the verdict
    pub fn format(outcome: &DebateOutcome) -> String {
        let ledger = &outcome.ledger;
        let mut output = String::new();

        output.push_str(&Self::header("Agora Debate Results"));
        output.push('\n');
        output.push_str(&Self::preamble(ledger));

        for record in ledger.rounds() {
            output.push_str(&Self::round(record));
        }

        output.push_str(&Self::trend(ledger));
        output.push_str(&Self::verdict(&outcome.verdict));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &DebateOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Score trend and verdict (concise output)
    pub fn format_summary(outcome: &DebateOutcome) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Agora Verdict ===".cyan().bold()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Q:".bold(),
            outcome.ledger.question()
        ));
        output.push_str(&format!(
            "{} {} voting round(s)\n",
            "Rounds:".dimmed(),
            outcome.ledger.voting_rounds()
        ));

        output.push_str(&Self::trend(&outcome.ledger));
        output.push_str(&Self::verdict(&outcome.verdict));

        if outcome.is_degraded() {
            output.push_str(&format!(
                "\n{}\n",
                "Some rounds had forfeits or disqualified rankings; see the full output."
                    .yellow()
            ));
        }

        output
    }

    fn preamble(ledger: &Ledger) -> String {
        let names: Vec<String> = ledger.roster().iter().map(|id| id.to_string()).collect();
        format!(
            "{} {}\n\n{} {}\n",
            "Question:".cyan().bold(),
            ledger.question(),
            "Participants:".cyan().bold(),
            names.join(", ")
        )
    }

    fn round(record: &RoundRecord) -> String {
        let title = if record.round == 0 {
            "Opening Statements".to_string()
        } else {
            format!("Round {}", record.round)
        };
        let mut output = Self::section_header(&title);

        for argument in &record.arguments {
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ──", argument.participant).yellow().bold(),
                Self::indent(&argument.text, "  ")
            ));
        }

        if let Some(votes) = &record.votes {
            output.push_str(&format!("\n{}\n", "Rankings:".cyan().bold()));
            for ranking in votes {
                let order: Vec<String> = ranking.order.iter().map(|id| id.to_string()).collect();
                output.push_str(&format!(
                    "  {:<14} {}\n",
                    ranking.voter.to_string().bold(),
                    order.join(" > ")
                ));
                if !ranking.reasoning.trim().is_empty() {
                    output.push_str(&format!(
                        "{}\n",
                        Self::indent(&ranking.reasoning, "                 ").dimmed()
                    ));
                }
            }
        }

        if let Some(scores) = &record.scores {
            output.push_str(&Self::scores(scores, record.consensus.as_ref()));
        }

        if !record.issues.is_empty() {
            output.push_str(&format!("\n{}\n", "Issues:".yellow().bold()));
            for issue in &record.issues {
                output.push_str(&format!("  ! {}\n", issue));
            }
        }

        output
    }

    /// Point totals as bars; percentages need the consensus check's maximum.
    fn scores(scores: &ScoreTable, check: Option<&ConsensusCheck>) -> String {
        let mut output = format!(
            "\n{} ({} voter(s))\n",
            "Scores:".cyan().bold(),
            scores.voter_count
        );
        let max = check
            .map(|c| c.max_attainable)
            .unwrap_or_else(|| scores.top_score());

        for entry in scores.ranked() {
            let percent = check
                .filter(|c| c.max_attainable > 0)
                .map(|c| {
                    format!(
                        " {:>5.1}%",
                        f64::from(entry.points) * 100.0 / f64::from(c.max_attainable)
                    )
                })
                .unwrap_or_default();
            output.push_str(&format!(
                "  {:<14} {} {:>4}{}\n",
                entry.participant.to_string(),
                Self::bar(entry.points, max).green(),
                entry.points,
                percent
            ));
        }

        match check {
            Some(check) if check.reached => {
                output.push_str(&format!("  {}\n", "Consensus reached".green().bold()));
            }
            Some(check) => {
                let mut line = format!(
                    "  No consensus: leader has {} of {:.1} points needed, {} more required",
                    check.top_score,
                    check.threshold_score,
                    check.points_needed()
                );
                if check.is_tied() {
                    line.push_str(" (tied at the top)");
                }
                output.push_str(&format!("{}\n", line.yellow()));
            }
            None => {
                output.push_str(&format!(
                    "  {}\n",
                    "Consensus not checked this round".dimmed()
                ));
            }
        }

        output
    }

    fn trend(ledger: &Ledger) -> String {
        if ledger.voting_rounds() == 0 {
            return String::new();
        }

        let mut output = Self::section_header("Score Trend");
        for id in ledger.roster().iter() {
            let points: Vec<String> = ledger
                .trend_for(id)
                .iter()
                .map(|p| p.to_string())
                .collect();
            output.push_str(&format!(
                "  {:<14} {}\n",
                id.to_string(),
                points.join(" -> ")
            ));
        }
        output
    }

    fn verdict(verdict: &Verdict) -> String {
        let mut output = Self::section_header("Verdict");

        let status = if verdict.consensus_reached {
            "Consensus reached".green().bold()
        } else {
            format!("No consensus ({})", verdict.termination).yellow().bold()
        };
        output.push_str(&format!("\n{}\n", status));
        output.push_str(&format!(
            "{} {}\n",
            "Winner:".cyan().bold(),
            verdict.winner.to_string().bold()
        ));

        if verdict.was_tie_broken() {
            let tied: Vec<String> = verdict.tied_leaders.iter().map(|id| id.to_string()).collect();
            output.push_str(&format!(
                "{} {} (earliest registered wins)\n",
                "Tied:".yellow().bold(),
                tied.join(", ")
            ));
        }

        if verdict.overridden {
            output.push_str(&format!(
                "{}\n{}\n",
                "The judge overrode the score leader:".magenta().bold(),
                Self::indent(verdict.override_reasoning.as_deref().unwrap_or(""), "  ")
            ));
        }

        if let Some(position) = &verdict.winning_position {
            output.push_str(&format!(
                "\n{}\n{}\n",
                "Winning position:".cyan().bold(),
                Self::indent(position, "  ")
            ));
        }

        if let Some(commentary) = &verdict.commentary {
            output.push_str(&format!(
                "\n{}\n{}\n",
                "Judge's summary:".cyan().bold(),
                Self::indent(commentary, "  ")
            ));
        }

        output
    }

    /// Fixed-width bar of `points` relative to `max`.
    pub fn bar(points: u32, max: u32) -> String {
        let filled = if max == 0 {
            0
        } else {
            ((points as usize * BAR_WIDTH) / max as usize).min(BAR_WIDTH)
        };
        format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, outcome: &DebateOutcome) -> String {
        Self::format(outcome)
    }

    fn format_json(&self, outcome: &DebateOutcome) -> String {
        Self::format_json(outcome)
    }

    fn format_summary(&self, outcome: &DebateOutcome) -> String {
        Self::format_summary(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_domain::{
        Argument, ConsensusDetector, DebateConfig, ParticipantId, Question, Ranking, RoundIssue,
        Roster, ScoreEngine, TerminationReason, CallKind,
    };

    fn ids(names: &[&str]) -> Vec<ParticipantId> {
        names.iter().map(|n| ParticipantId::new(*n)).collect()
    }

    fn outcome() -> DebateOutcome {
        let config = DebateConfig::default().with_iterations(1, 3);
        let roster = Roster::new(ids(&["Optimist", "Skeptic", "Critic"])).unwrap();
        let mut ledger = Ledger::new(Question::try_new("Adopt Rust?").unwrap(), roster.clone());

        let opening: Vec<Argument> = roster
            .iter()
            .map(|id| Argument::new(id.clone(), 0, format!("{} opens", id)))
            .collect();
        ledger
            .append(RoundRecord::arguments_only(0, roster.clone(), opening, vec![]))
            .unwrap();

        let arguments: Vec<Argument> = roster
            .iter()
            .map(|id| Argument::new(id.clone(), 1, format!("{} rebuts", id)))
            .collect();
        let votes = vec![
            Ranking::new(
                "Optimist".into(),
                1,
                ids(&["Skeptic", "Optimist", "Critic"]),
                "Sharp points".to_string(),
            ),
            Ranking::new(
                "Skeptic".into(),
                1,
                ids(&["Skeptic", "Critic", "Optimist"]),
                String::new(),
            ),
        ];
        let scores = ScoreEngine::score(1, &votes, &roster, &config.scoring_system).unwrap();
        let consensus = ConsensusDetector::evaluate(&scores, &config);
        ledger
            .append(RoundRecord {
                round: 1,
                ballot: roster.clone(),
                arguments,
                votes: Some(votes),
                scores: Some(scores.clone()),
                consensus: Some(consensus),
                issues: vec![RoundIssue::Forfeit {
                    participant: "Critic".into(),
                    call: CallKind::Ranking,
                    attempts: 3,
                    reason: "timed out".to_string(),
                }],
            })
            .unwrap();

        let verdict = Verdict {
            consensus_reached: true,
            winner: "Skeptic".into(),
            tied_leaders: vec![],
            overridden: false,
            override_reasoning: None,
            termination: TerminationReason::Converged,
            winning_position: Some("Skeptic rebuts".to_string()),
            commentary: Some("Well argued".to_string()),
        };

        DebateOutcome {
            ledger,
            verdict,
            final_scores: Some(scores),
        }
    }

    #[test]
    fn test_bar() {
        assert_eq!(ConsoleFormatter::bar(8, 8), "█".repeat(20));
        assert_eq!(ConsoleFormatter::bar(0, 8), "░".repeat(20));
        assert_eq!(
            ConsoleFormatter::bar(4, 8),
            format!("{}{}", "█".repeat(10), "░".repeat(10))
        );
        assert_eq!(ConsoleFormatter::bar(3, 0), "░".repeat(20));
    }

    #[test]
    fn test_full_output() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format(&outcome());

        assert!(output.contains("Question: Adopt Rust?"));
        assert!(output.contains("Opening Statements"));
        assert!(output.contains("Round 1"));
        assert!(output.contains("Skeptic > Optimist > Critic"));
        assert!(output.contains("Sharp points"));
        // Skeptic: 4 + 4 of 8 attainable
        assert!(output.contains("100.0%"));
        assert!(output.contains("Consensus reached"));
        assert!(output.contains("Critic forfeited its ranking after 3 attempt(s)"));
        assert!(output.contains("Winner: Skeptic"));
        assert!(output.contains("Well argued"));
    }

    #[test]
    fn test_summary_output() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format_summary(&outcome());

        assert!(output.contains("Score Trend"));
        assert!(output.contains("Winner: Skeptic"));
        assert!(output.contains("forfeits"));
        assert!(!output.contains("Opening Statements"));
    }

    #[test]
    fn test_json_output_round_trips() {
        let outcome = outcome();
        let json = ConsoleFormatter::format_json(&outcome);
        let parsed: DebateOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.verdict, outcome.verdict);
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "> "), "> a\n> b");
    }
}
