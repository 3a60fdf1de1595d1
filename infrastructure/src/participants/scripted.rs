//! Offline participants with canned replies.
//!
//! Used by `--offline` runs and tests. Arguments and rankings are
//! scripted per round; past the end of a script its last entry repeats.

use agora_application::{
    ArgumentRequest, CapabilityError, Participant, RankingDraft, RankingRequest,
};
use agora_domain::ParticipantId;
use async_trait::async_trait;

pub struct ScriptedParticipant {
    id: ParticipantId,
    /// Per round, round 0 first
    arguments: Vec<String>,
    /// Per voting round, round 1 first; names not on the ballot are skipped
    rankings: Vec<(Vec<ParticipantId>, String)>,
}

impl ScriptedParticipant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(name),
            arguments: Vec::new(),
            rankings: Vec::new(),
        }
    }

    /// `{question}` and `{round}` are substituted in each argument.
    pub fn with_arguments(mut self, arguments: Vec<String>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_rankings(mut self, rankings: Vec<Vec<String>>) -> Self {
        self.rankings = rankings
            .into_iter()
            .map(|order| (order.into_iter().map(ParticipantId::new).collect(), String::new()))
            .collect();
        self
    }

    pub fn with_ranking(mut self, order: &[&str], reasoning: &str) -> Self {
        self.rankings.push((
            order.iter().map(|n| ParticipantId::new(*n)).collect(),
            reasoning.to_string(),
        ));
        self
    }

    /// The four-persona panel used when no participants are configured.
    ///
    /// Round 1 everyone backs themselves; from round 2 the panel converges
    /// on the Visionary.
    pub fn default_panel() -> Vec<ScriptedParticipant> {
        let panel = [
            (
                "Optimist",
                "{question} Yes: the upside is large and the risks are manageable with care.",
                ["Optimist", "Visionary", "Skeptic", "Critic"],
                "I believe my optimistic approach was most compelling",
                ["Visionary", "Optimist", "Skeptic", "Critic"],
                "The Visionary made excellent points about balanced innovation",
            ),
            (
                "Skeptic",
                "{question} Not so fast: the evidence offered so far is thin (round {round}).",
                ["Skeptic", "Critic", "Optimist", "Visionary"],
                "The critical analysis was more thorough",
                ["Visionary", "Skeptic", "Critic", "Optimist"],
                "The visionary approach addressed my concerns well",
            ),
            (
                "Visionary",
                "{question} Think ten years out: adopt gradually, measure, then commit.",
                ["Visionary", "Optimist", "Critic", "Skeptic"],
                "Innovation-focused arguments were strongest",
                ["Visionary", "Optimist", "Skeptic", "Critic"],
                "My position remains strong with growing support",
            ),
            (
                "Critic",
                "{question} The costs are being underestimated; who pays for the migration?",
                ["Critic", "Skeptic", "Visionary", "Optimist"],
                "Risk analysis was most important",
                ["Visionary", "Critic", "Skeptic", "Optimist"],
                "The visionary balanced innovation with practical considerations",
            ),
        ];

        panel
            .into_iter()
            .map(|(name, argument, first, first_why, then, then_why)| {
                ScriptedParticipant::new(name)
                    .with_arguments(vec![argument.to_string()])
                    .with_ranking(&first, first_why)
                    .with_ranking(&then, then_why)
            })
            .collect()
    }

    fn argument_for(&self, question: &str, round: usize) -> String {
        let template = self
            .arguments
            .get(round)
            .or_else(|| self.arguments.last())
            .map(String::as_str)
            .unwrap_or("{question} I maintain my position in round {round}.");
        template
            .replace("{question}", question)
            .replace("{round}", &round.to_string())
    }
}

#[async_trait]
impl Participant for ScriptedParticipant {
    fn id(&self) -> &ParticipantId {
        &self.id
    }

    async fn produce_argument(
        &self,
        request: ArgumentRequest<'_>,
    ) -> Result<String, CapabilityError> {
        Ok(self.argument_for(request.question.content(), request.round))
    }

    /// Follows the script, then appends unscripted ballot members in
    /// registration order so the ranking is always complete.
    async fn produce_ranking(
        &self,
        request: RankingRequest<'_>,
    ) -> Result<RankingDraft, CapabilityError> {
        let index = request.round.saturating_sub(1);
        let (script, reasoning) = self
            .rankings
            .get(index)
            .or_else(|| self.rankings.last())
            .cloned()
            .unwrap_or_else(|| (vec![self.id.clone()], "Scripted vote".to_string()));

        let mut order: Vec<ParticipantId> = Vec::with_capacity(request.ballot.len());
        for id in script.iter().chain(request.ballot.iter()) {
            if request.ballot.contains(id) && !order.contains(id) {
                order.push(id.clone());
            }
        }
        Ok(RankingDraft::new(order, reasoning))
    }
}
