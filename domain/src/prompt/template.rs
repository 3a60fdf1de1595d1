//! Prompt templates for each phase of a debate

use crate::core::participant::{ParticipantId, Roster};
use crate::debate::argument::Argument;
use crate::debate::ledger::Ledger;
use crate::prompt::persona::Persona;
use crate::scoring::score::ScoreTable;

/// Templates for generating prompts at each stage
pub struct DebatePromptTemplate;

impl DebatePromptTemplate {
    /// User prompt for the opening round (no context).
    pub fn opening(question: &str, persona: &Persona) -> String {
        format!(
            r#"Question: {}

Based on your personality and expertise, state your strongest initial position on this question.

Your goal is to win this debate:
- Provide expert-level analysis that holds up against opposing viewpoints
- Draw on relevant fields to build a well-supported argument
- Be specific with principles and examples that back your position

Others will try to convince the group of their own answer. Provide a position
that reflects {}/10 depth of analysis. Keep it to 2-3 paragraphs."#,
            question, persona.reasoning_depth
        )
    }

    /// User prompt for an argument round after the opening.
    pub fn rebuttal(
        question: &str,
        round: usize,
        persona: &Persona,
        history: &Ledger,
        same_round: &[Argument],
    ) -> String {
        format!(
            r#"Question: {}

Current debate context:
{}
This is round {} of the debate. Your task:
1. Engage with at least two other participants' arguments and point out their weaknesses
2. Where you disagree, counter their position with better evidence and reasoning
3. Where you agree, show how your interpretation is more complete
4. Do not concede unless the evidence is overwhelming (belief persistence: {}/10)

Provide a response with {}/10 depth. Keep it to 2-3 paragraphs."#,
            question,
            Self::transcript(history, same_round),
            round,
            persona.belief_persistence,
            persona.reasoning_depth
        )
    }

    /// System prompt for the voting phase
    pub fn voting_system() -> &'static str {
        "You are participating in a debate and must now rank all participants. \
         Be objective but consider your personality traits. Reply with JSON only."
    }

    /// User prompt asking for a full ranking of `ballot`.
    pub fn voting(
        ballot: &Roster,
        history: &Ledger,
        arguments: &[Argument],
        persona: &Persona,
    ) -> String {
        let names: Vec<&str> = ballot.iter().map(|p| p.as_str()).collect();
        format!(
            r#"Based on the debate so far, rank all participants (including yourself) from best to worst based on:
1. Quality of arguments
2. Logic and reasoning
3. Ability to address others' points
4. Persuasiveness

Participants: {}

Debate context:
{}
Every participant listed above must appear exactly once.
Return your rankings as JSON in this format:
{{
    "rankings": [{}],
    "reasoning": "Brief explanation of your rankings"
}}

Be fair and objective, considering your personality traits:
- Fairness level: {}/10
- Self-confidence: {}/10"#,
            names.join(", "),
            Self::transcript(history, arguments),
            names
                .iter()
                .map(|n| format!("\"{}\"", n))
                .collect::<Vec<_>>()
                .join(", "),
            persona.voting.fairness,
            persona.voting.self_confidence
        )
    }

    /// System prompt for the judge
    pub fn judge_system() -> &'static str {
        r#"You are an impartial judge tasked with reviewing a finished debate.
You carefully consider all arguments presented, weighing their merits and identifying the strongest points
from each side. Your judgment should be well-reasoned and practical."#
    }

    /// User prompt for the judge's final review.
    pub fn judge(
        ledger: &Ledger,
        final_scores: Option<&ScoreTable>,
        default_winner: &ParticipantId,
        consensus_reached: bool,
        may_override: bool,
        override_threshold: f64,
    ) -> String {
        let mut prompt = format!(
            "Question: {}\n\nFull debate transcript:\n{}\n",
            ledger.question(),
            Self::transcript(ledger, &[])
        );

        if let Some(scores) = final_scores {
            prompt.push_str("Final scores:\n");
            for entry in scores.ranked() {
                prompt.push_str(&format!("- {}: {} points\n", entry.participant, entry.points));
            }
            prompt.push('\n');
        }

        prompt.push_str(&format!(
            "The voting {} and currently selects {} as the winner.\n\n",
            if consensus_reached {
                "reached consensus"
            } else {
                "did not reach consensus"
            },
            default_winner
        ));

        if may_override {
            prompt.push_str(&format!(
                r#"You may confirm this outcome or override it. Override only if you are at least
{:.0}% convinced another participant's position is better, and explain why.

Reply with JSON:
{{
    "decision": "confirm" or "override",
    "winner": "participant name (required when overriding)",
    "reasoning": "why you confirm or override",
    "summary": "your final answer to the question"
}}"#,
                override_threshold * 100.0
            ));
        } else {
            prompt.push_str(
                r#"Overrides are disabled: confirm the outcome and give your final judgment.

Reply with JSON:
{
    "decision": "confirm",
    "reasoning": "your assessment",
    "summary": "your final answer to the question"
}"#,
            );
        }
        prompt
    }

    /// Render prior rounds plus arguments from the current round.
    pub fn transcript(history: &Ledger, current: &[Argument]) -> String {
        let mut text = String::new();
        for record in history.rounds() {
            text.push_str(&format!("=== Round {} ===\n", record.round));
            for arg in &record.arguments {
                text.push_str(&format!("{}: {}\n\n", arg.participant, arg.text));
            }
            if let Some(scores) = &record.scores {
                let standings: Vec<String> = scores
                    .ranked()
                    .iter()
                    .map(|e| format!("{} {}", e.participant, e.points))
                    .collect();
                text.push_str(&format!(
                    "Scores after round {}: {}\n\n",
                    record.round,
                    standings.join(", ")
                ));
            }
        }
        if let Some(first) = current.first() {
            text.push_str(&format!("=== Round {} (in progress) ===\n", first.round));
            for arg in current {
                text.push_str(&format!("{}: {}\n\n", arg.participant, arg.text));
            }
        }
        text
    }
}
