use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Produces the final answer from a question and its assembled context
#[async_trait]
pub trait AnswerGenerator: Send + Sync + Debug {
    async fn generate(&self, question: &str, context: &str) -> Result<String, DomainError>;

    /// Get the generator name
    fn generator_name(&self) -> &'static str;
}

/// Rewrites a question into a web search query
#[async_trait]
pub trait QueryRewriter: Send + Sync + Debug {
    async fn rewrite(&self, question: &str) -> Result<String, DomainError>;

    /// Get the rewriter name
    fn rewriter_name(&self) -> &'static str;
}
