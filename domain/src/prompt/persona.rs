//! Debater personas: the character an LLM participant plays.

use serde::{Deserialize, Serialize};

/// Traits that shape how a persona ranks others (1-10 each)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VotingTraits {
    pub fairness: u8,
    pub self_confidence: u8,
    pub strategic_thinking: u8,
    pub empathy: u8,
}

impl Default for VotingTraits {
    fn default() -> Self {
        Self {
            fairness: 7,
            self_confidence: 5,
            strategic_thinking: 5,
            empathy: 5,
        }
    }
}

/// A debater's character.
///
/// Either an explicit `system_prompt` is given, or one is composed from the
/// role/perspective/style fields and the trait scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    pub name: String,
    pub system_prompt: Option<String>,
    pub role: Option<String>,
    pub perspective: Option<String>,
    pub debate_style: Option<String>,
    pub reasoning_depth: u8,
    pub agreeableness: u8,
    pub conviction: u8,
    pub openness: u8,
    pub truth_seeking: u8,
    pub belief_persistence: u8,
    pub voting: VotingTraits,
    pub special_instructions: Option<String>,
    pub knowledge_base: Option<String>,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: String::new(),
            system_prompt: None,
            role: None,
            perspective: None,
            debate_style: None,
            reasoning_depth: 7,
            agreeableness: 5,
            conviction: 7,
            openness: 6,
            truth_seeking: 8,
            belief_persistence: 6,
            voting: VotingTraits::default(),
            special_instructions: None,
            knowledge_base: None,
        }
    }
}

impl Persona {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_perspective(mut self, perspective: impl Into<String>) -> Self {
        self.perspective = Some(perspective.into());
        self
    }

    /// System prompt sent with every request.
    pub fn system_prompt(&self) -> String {
        if let Some(prompt) = self.system_prompt.as_deref()
            && !prompt.trim().is_empty()
        {
            return prompt.to_string();
        }

        let mut prompt = format!(
            r#"You are {}, {}.

Your perspective: {}
Your debate style: {}

Personality traits:
- Reasoning depth: {}/10
- Agreeableness: {}/10
- Conviction in beliefs: {}/10
- Openness to new ideas: {}/10
- Truth-seeking: {}/10

When voting, consider:
- Fairness: {}/10
- Self-confidence: {}/10
- Strategic thinking: {}/10
- Empathy: {}/10"#,
            self.name,
            self.role.as_deref().unwrap_or("a debate participant"),
            self.perspective
                .as_deref()
                .unwrap_or("bringing unique insights to the debate"),
            self.debate_style
                .as_deref()
                .unwrap_or("thoughtful and analytical"),
            self.reasoning_depth,
            self.agreeableness,
            self.conviction,
            self.openness,
            self.truth_seeking,
            self.voting.fairness,
            self.voting.self_confidence,
            self.voting.strategic_thinking,
            self.voting.empathy,
        );

        if let Some(extra) = &self.special_instructions {
            prompt.push_str(&format!("\n\nSpecial instructions: {}", extra));
        }
        if let Some(kb) = &self.knowledge_base {
            prompt.push_str(&format!("\n\nYour knowledge base: {}", kb));
        }
        prompt
    }

    /// Human-readable problems with the trait settings.
    ///
    /// Out-of-range scores and contradictory combinations are reported;
    /// none of them prevents the persona from being used.
    pub fn trait_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let scores = [
            ("reasoning_depth", self.reasoning_depth),
            ("agreeableness", self.agreeableness),
            ("conviction", self.conviction),
            ("openness", self.openness),
            ("truth_seeking", self.truth_seeking),
            ("belief_persistence", self.belief_persistence),
            ("voting.fairness", self.voting.fairness),
            ("voting.self_confidence", self.voting.self_confidence),
            ("voting.strategic_thinking", self.voting.strategic_thinking),
            ("voting.empathy", self.voting.empathy),
        ];
        for (name, value) in scores {
            if !(1..=10).contains(&value) {
                warnings.push(format!("{} must be between 1 and 10, got {}", name, value));
            }
        }
        if self.conviction >= 8 && self.openness >= 8 {
            warnings.push("high conviction (>=8) with high openness (>=8) is contradictory".into());
        }
        if self.agreeableness <= 3 && self.voting.empathy >= 8 {
            warnings.push(
                "low agreeableness (<=3) with high empathy (>=8) is contradictory".into(),
            );
        }
        warnings
    }
}
