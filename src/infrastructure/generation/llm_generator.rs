use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::{AnswerGenerator, DomainError};

/// Answers strictly from the supplied context with a chat model
#[derive(Debug)]
pub struct LlmAnswerGenerator {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl LlmAnswerGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    fn build_prompt(question: &str, context: &str) -> String {
        format!(
            "Answer the question based strictly on the provided context. \
             If the context is insufficient, state that you do not know.\n\n\
             Context:\n{}\n\nQuestion: {}",
            context, question
        )
    }
}

#[async_trait]
impl AnswerGenerator for LlmAnswerGenerator {
    async fn generate(&self, question: &str, context: &str) -> Result<String, DomainError> {
        debug!(model = %self.model, context_len = context.len(), "Generating answer");

        let request = LlmRequest::builder()
            .user(Self::build_prompt(question, context))
            .temperature(0.1)
            .build();

        let response = self.provider.chat(&self.model, request).await?;

        Ok(response.content().unwrap_or_default().to_string())
    }

    fn generator_name(&self) -> &'static str {
        "llm"
    }
}
