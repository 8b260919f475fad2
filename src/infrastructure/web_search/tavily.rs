//! Tavily web search adapter

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{DomainError, WebSearcher};
use crate::infrastructure::llm::HttpClientTrait;

pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";

/// Web searcher backed by the Tavily search API
#[derive(Debug)]
pub struct TavilySearcher<C: HttpClientTrait> {
    client: C,
    api_key: Option<String>,
    base_url: String,
}

impl<C: HttpClientTrait> TavilySearcher<C> {
    pub fn new(client: C, api_key: Option<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_TAVILY_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.filter(|key| !key.is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    content: Option<String>,
    snippet: Option<String>,
}

impl TavilyResult {
    fn into_snippet(self) -> Option<String> {
        self.content
            .filter(|c| !c.is_empty())
            .or(self.snippet)
            .filter(|s| !s.is_empty())
    }
}

#[async_trait]
impl<C: HttpClientTrait> WebSearcher for TavilySearcher<C> {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<String>, DomainError> {
        let Some(api_key) = &self.api_key else {
            warn!("Web search API key not set; skipping web search");
            return Ok(Vec::new());
        };

        let body = serde_json::json!({
            "api_key": api_key,
            "query": query,
            "max_results": top_k,
        });

        let response = self
            .client
            .post_json(
                &self.search_url(),
                vec![("Content-Type", "application/json")],
                &body,
            )
            .await?;

        let parsed: TavilyResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::provider("tavily", format!("Failed to parse response: {}", e))
        })?;

        let snippets: Vec<String> = parsed
            .results
            .into_iter()
            .filter_map(TavilyResult::into_snippet)
            .collect();

        debug!(count = snippets.len(), "Web search returned snippets");
        Ok(snippets)
    }

    fn searcher_name(&self) -> &'static str {
        "tavily"
    }
}
