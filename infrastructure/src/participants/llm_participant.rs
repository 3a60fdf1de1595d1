//! Participant backed by a chat model playing a persona.

use super::backend::{ChatBackend, ChatOptions};
use agora_application::{
    ArgumentRequest, CapabilityError, Participant, RankingDraft, RankingRequest,
};
use agora_domain::{DebatePromptTemplate, ParticipantId, Persona, parse_ranking_response};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub struct LlmParticipant {
    id: ParticipantId,
    persona: Persona,
    backend: Arc<dyn ChatBackend>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl LlmParticipant {
    /// The participant id is the persona name.
    pub fn new(persona: Persona, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            id: ParticipantId::new(persona.name.clone()),
            persona,
            backend,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_sampling(mut self, max_tokens: Option<u32>, temperature: Option<f32>) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }
}

#[async_trait]
impl Participant for LlmParticipant {
    fn id(&self) -> &ParticipantId {
        &self.id
    }

    async fn produce_argument(
        &self,
        request: ArgumentRequest<'_>,
    ) -> Result<String, CapabilityError> {
        let question = request.question.content();
        let prompt = if request.round == 0 {
            DebatePromptTemplate::opening(question, &self.persona)
        } else {
            DebatePromptTemplate::rebuttal(
                question,
                request.round,
                &self.persona,
                request.history,
                request.same_round,
            )
        };

        debug!(
            "{} arguing round {} via {}",
            self.id,
            request.round,
            self.backend.describe()
        );
        self.backend
            .complete(
                &self.persona.system_prompt(),
                &prompt,
                ChatOptions::argument().with_overrides(self.max_tokens, self.temperature),
            )
            .await
    }

    async fn produce_ranking(
        &self,
        request: RankingRequest<'_>,
    ) -> Result<RankingDraft, CapabilityError> {
        let prompt = DebatePromptTemplate::voting(
            request.ballot,
            request.history,
            request.arguments,
            &self.persona,
        );
        let reply = self
            .backend
            .complete(
                DebatePromptTemplate::voting_system(),
                &prompt,
                ChatOptions::voting().with_overrides(self.max_tokens, None),
            )
            .await?;

        let parsed = parse_ranking_response(&reply, request.ballot).ok_or_else(|| {
            CapabilityError::Transient(format!("{} replied without a ranking object", self.id))
        })?;
        Ok(RankingDraft::new(parsed.order, parsed.reasoning))
    }
}
