use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::{DomainError, QueryRewriter};

const SYSTEM_PROMPT: &str = "You are a search query optimizer. \
Extract at most three keywords separated by comma from the question as queries for web search. \
Include topic background and main intent.\n\n\
Examples:\n\
Q: What is Henry Feilden's occupation?\n\
A: Henry Feilden, occupation\n\
Q: In what city was Billy Carlson born?\n\
A: city, Billy Carlson, born\n\
Q: What is the religion of John Gwynn?\n\
A: religion of John Gwynn\n";

/// Turns a natural-language question into a short keyword query
#[derive(Debug)]
pub struct LlmQueryRewriter {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl LlmQueryRewriter {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Keep only the text after the last `A:` marker
    fn clean(reply: &str) -> &str {
        let reply = reply.trim();
        match reply.rfind("A:") {
            Some(idx) => reply[idx + 2..].trim(),
            None => reply,
        }
    }
}

#[async_trait]
impl QueryRewriter for LlmQueryRewriter {
    async fn rewrite(&self, question: &str) -> Result<String, DomainError> {
        let request = LlmRequest::builder()
            .system(SYSTEM_PROMPT)
            .user(format!("Q: {}\nA:", question))
            .temperature(0.0)
            .max_tokens(60)
            .build();

        let response = self.provider.chat(&self.model, request).await?;
        let rewritten = Self::clean(response.content().unwrap_or_default());

        debug!(rewritten, "Rewrote query");

        if rewritten.is_empty() {
            Ok(question.to_string())
        } else {
            Ok(rewritten.to_string())
        }
    }

    fn rewriter_name(&self) -> &'static str {
        "llm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;

    #[tokio::test]
    async fn test_rewrite_returns_keywords() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_reply("track gauge, standard"));
        let rewriter = LlmQueryRewriter::new(provider.clone(), "gpt-4o");

        let rewritten = rewriter.rewrite("What is the standard track gauge?").await.unwrap();

        assert_eq!(rewritten, "track gauge, standard");

        let request = provider.last_request().unwrap();
        assert_eq!(request.max_tokens, Some(60));
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(
            request.messages[1].content,
            "Q: What is the standard track gauge?\nA:"
        );
    }

    #[tokio::test]
    async fn test_rewrite_strips_answer_prefix() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_reply("A: sleepers, spacing"));
        let rewriter = LlmQueryRewriter::new(provider, "gpt-4o");

        assert_eq!(rewriter.rewrite("q").await.unwrap(), "sleepers, spacing");
    }

    #[tokio::test]
    async fn test_empty_rewrite_keeps_question() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_reply("  A:  "));
        let rewriter = LlmQueryRewriter::new(provider, "gpt-4o");

        assert_eq!(
            rewriter.rewrite("original question").await.unwrap(),
            "original question"
        );
    }
}
