use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// External web search returning text snippets
#[async_trait]
pub trait WebSearcher: Send + Sync + Debug {
    /// Return up to `top_k` snippets for `query`.
    ///
    /// Missing credentials yield an empty list rather than an error.
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<String>, DomainError>;

    /// Get the searcher name
    fn searcher_name(&self) -> &'static str;
}
