//! Token-overlap relevance scorer used when no scoring backend is configured

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::crag::{EvaluationResult, RelevanceScorer};

/// Scores passages by Jaccard overlap of their lowercase whitespace tokens,
/// rescaled from [0, 1] to [-1, 1]
#[derive(Debug, Clone, Default)]
pub struct LexicalRelevanceScorer;

impl LexicalRelevanceScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score a single pair
    pub fn score_pair(query: &str, passage: &str) -> f32 {
        let query_tokens = tokenize(query);
        let passage_tokens = tokenize(passage);
        let jaccard = jaccard(&query_tokens, &passage_tokens);

        (2.0 * jaccard - 1.0).clamp(-1.0, 1.0)
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(String::from)
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.union(b).count();

    intersection as f32 / union.max(1) as f32
}

#[async_trait]
impl RelevanceScorer for LexicalRelevanceScorer {
    async fn score(&self, query: &str, items: &[String]) -> Vec<EvaluationResult> {
        items
            .iter()
            .map(|item| {
                EvaluationResult::new(
                    Self::score_pair(query, item),
                    EvaluationResult::TOKEN_OVERLAP,
                )
            })
            .collect()
    }

    fn scorer_name(&self) -> &'static str {
        "lexical"
    }
}
