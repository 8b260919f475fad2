//! Relevance scoring traits and types

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Score of one (query, passage) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Relevance in [-1, 1]
    pub score: f32,
    pub rationale: String,
}

impl EvaluationResult {
    /// Rationale attached to the neutral score substituted after a failed judgement
    pub const PARSE_ERROR: &'static str = "parse_error";
    /// Rationale produced by the lexical fallback scorer
    pub const TOKEN_OVERLAP: &'static str = "token_overlap";

    pub fn new(score: f32, rationale: impl Into<String>) -> Self {
        Self {
            score,
            rationale: rationale.into(),
        }
    }

    /// Neutral result used when a judgement could not be obtained
    pub fn parse_error() -> Self {
        Self::new(0.0, Self::PARSE_ERROR)
    }
}

/// Scores a batch of passages against a query.
///
/// The output is index-aligned with `items` and has the same length, even when
/// every underlying call fails. Implementations never return an error.
#[async_trait]
pub trait RelevanceScorer: Send + Sync + Debug {
    async fn score(&self, query: &str, items: &[String]) -> Vec<EvaluationResult>;

    /// Get the scorer name
    fn scorer_name(&self) -> &'static str;
}

/// External judge for a single (query, passage) pair
#[async_trait]
pub trait ScoringBackend: Send + Sync + Debug {
    async fn judge(&self, query: &str, passage: &str) -> Result<RelevanceJudgement, DomainError>;

    /// Get the backend name
    fn backend_name(&self) -> &'static str;
}

/// Structured judgement returned by a scoring backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceJudgement {
    pub relevance_score: f32,
    pub reasoning: String,
}

impl RelevanceJudgement {
    pub fn new(relevance_score: f32, reasoning: impl Into<String>) -> Self {
        Self {
            relevance_score,
            reasoning: reasoning.into(),
        }
    }

    /// Decode a raw reply, tolerating prose or code fences around the JSON object
    pub fn decode(raw: &str) -> Result<Self, DomainError> {
        let json = extract_json(raw).unwrap_or(raw);

        let judgement: Self = serde_json::from_str(json).map_err(|e| {
            DomainError::validation(format!("Invalid relevance judgement format: {}", e))
        })?;

        judgement.validate()?;
        Ok(judgement)
    }

    /// Check the score is a finite number within [-1, 1]
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.relevance_score.is_finite() || !(-1.0..=1.0).contains(&self.relevance_score) {
            return Err(DomainError::validation(format!(
                "relevance_score {} is outside [-1, 1]",
                self.relevance_score
            )));
        }
        Ok(())
    }

    /// JSON schema describing the expected reply
    pub fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "relevance_score": {
                    "type": "number",
                    "minimum": -1.0,
                    "maximum": 1.0,
                    "description": "Relevance of the passage to the query, from -1 (irrelevant) to 1 (fully relevant)"
                },
                "reasoning": {
                    "type": "string",
                    "description": "Short justification for the score"
                }
            },
            "required": ["relevance_score", "reasoning"],
            "additionalProperties": false
        })
    }
}

impl From<RelevanceJudgement> for EvaluationResult {
    fn from(judgement: RelevanceJudgement) -> Self {
        Self::new(judgement.relevance_score, judgement.reasoning)
    }
}

/// Extract the outermost JSON object from a string (handles markdown code blocks)
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start < end {
        Some(&text[start..=end])
    } else {
        None
    }
}

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Scorer returning a fixed score per passage text
    #[derive(Debug, Default)]
    pub struct MockRelevanceScorer {
        scores: HashMap<String, f32>,
        default_score: f32,
        calls: AtomicUsize,
    }

    impl MockRelevanceScorer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_score(mut self, passage: impl Into<String>, score: f32) -> Self {
            self.scores.insert(passage.into(), score);
            self
        }

        pub fn with_default_score(mut self, score: f32) -> Self {
            self.default_score = score;
            self
        }

        /// Number of `score` batches received
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RelevanceScorer for MockRelevanceScorer {
        async fn score(&self, _query: &str, items: &[String]) -> Vec<EvaluationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            items
                .iter()
                .map(|item| {
                    let score = self.scores.get(item).copied().unwrap_or(self.default_score);
                    EvaluationResult::new(score, "mock")
                })
                .collect()
        }

        fn scorer_name(&self) -> &'static str {
            "mock"
        }
    }

    /// Backend returning a fixed judgement per passage, or failing for listed passages
    #[derive(Debug, Default)]
    pub struct MockScoringBackend {
        judgements: HashMap<String, RelevanceJudgement>,
        failures: HashMap<String, String>,
        default_score: f32,
        delay_ms: u64,
        calls: AtomicUsize,
    }

    impl MockScoringBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_score(mut self, passage: impl Into<String>, score: f32) -> Self {
            self.judgements
                .insert(passage.into(), RelevanceJudgement::new(score, "mock judgement"));
            self
        }

        pub fn with_failure(mut self, passage: impl Into<String>, error: impl Into<String>) -> Self {
            self.failures.insert(passage.into(), error.into());
            self
        }

        pub fn with_default_score(mut self, score: f32) -> Self {
            self.default_score = score;
            self
        }

        pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
            self.delay_ms = delay_ms;
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ScoringBackend for MockScoringBackend {
        async fn judge(
            &self,
            _query: &str,
            passage: &str,
        ) -> Result<RelevanceJudgement, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
            }

            if let Some(error) = self.failures.get(passage) {
                return Err(DomainError::provider("mock_backend", error.clone()));
            }

            Ok(self
                .judgements
                .get(passage)
                .cloned()
                .unwrap_or_else(|| RelevanceJudgement::new(self.default_score, "default")))
        }

        fn backend_name(&self) -> &'static str {
            "mock"
        }
    }
}
