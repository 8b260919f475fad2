//! Relevance scorer delegating each pair to a scoring backend

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::domain::crag::{EvaluationResult, RelevanceScorer, ScoringBackend};
use crate::domain::CallPolicy;

/// Scores items concurrently through a backend; failed items get a neutral score
#[derive(Debug, Clone)]
pub struct BackedRelevanceScorer {
    backend: Arc<dyn ScoringBackend>,
    policy: CallPolicy,
    max_concurrency: usize,
}

impl BackedRelevanceScorer {
    pub fn new(backend: Arc<dyn ScoringBackend>, policy: CallPolicy, max_concurrency: usize) -> Self {
        Self {
            backend,
            policy,
            max_concurrency: max_concurrency.max(1),
        }
    }

    async fn score_one(&self, query: &str, item: &str, index: usize) -> EvaluationResult {
        let outcome = self
            .policy
            .run("relevance_judgement", || self.backend.judge(query, item))
            .await;

        match outcome {
            Ok(judgement) => {
                debug!(
                    index,
                    score = judgement.relevance_score,
                    "Judged passage"
                );
                judgement.into()
            }
            Err(e) => {
                warn!(
                    backend = self.backend.backend_name(),
                    index,
                    error = %e,
                    "Relevance judgement failed, using neutral score"
                );
                EvaluationResult::parse_error()
            }
        }
    }
}

#[async_trait]
impl RelevanceScorer for BackedRelevanceScorer {
    async fn score(&self, query: &str, items: &[String]) -> Vec<EvaluationResult> {
        let pending: Vec<_> = items
            .iter()
            .enumerate()
            .map(|(index, item)| self.score_one(query, item, index))
            .collect();

        stream::iter(pending)
            .buffered(self.max_concurrency)
            .collect()
            .await
    }

    fn scorer_name(&self) -> &'static str {
        "backed"
    }
}
