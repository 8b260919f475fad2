//! LLM-based scoring backend
//!
//! Asks a chat model for a structured `{relevance_score, reasoning}` judgement.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::crag::{RelevanceJudgement, ScoringBackend};
use crate::domain::llm::{LlmJsonSchema, LlmProvider, LlmRequest};
use crate::domain::DomainError;

const SYSTEM_PROMPT: &str =
    "You are a strict retrieval evaluator. Assess if the document answers the query.";

const SCHEMA_NAME: &str = "relevance_judgement";

/// Scoring backend that uses an LLM for evaluation
#[derive(Debug)]
pub struct LlmScoringBackend {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl LlmScoringBackend {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    fn build_request(&self, query: &str, passage: &str) -> LlmRequest {
        let user = format!(
            "Query: {}\nDocument: {}\n\n\
             Respond with a JSON object with the fields \"relevance_score\" \
             (a number from -1 for irrelevant to 1 for fully relevant) and \
             \"reasoning\" (a brief reason for the score).",
            query, passage
        );

        LlmRequest::builder()
            .system(SYSTEM_PROMPT)
            .user(user)
            .temperature(0.0)
            .json_schema(LlmJsonSchema::new(
                SCHEMA_NAME,
                RelevanceJudgement::json_schema(),
            ))
            .build()
    }
}

#[async_trait]
impl ScoringBackend for LlmScoringBackend {
    async fn judge(&self, query: &str, passage: &str) -> Result<RelevanceJudgement, DomainError> {
        debug!(model = %self.model, "Judging passage relevance");

        let response = self
            .provider
            .chat(&self.model, self.build_request(query, passage))
            .await?;

        let content = response
            .content()
            .ok_or_else(|| DomainError::provider("llm_judge", "Empty response from LLM"))?;

        RelevanceJudgement::decode(content)
    }

    fn backend_name(&self) -> &'static str {
        "llm"
    }
}
