//! Decompose-filter-recompose refinement of retrieved documents

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::scorer::RelevanceScorer;

/// Sentence terminator followed by whitespace
static STRIP_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?。！？]\s+").unwrap());

/// Split text into trimmed, non-empty sentence strips.
///
/// Boundaries fall after the terminator, so each strip keeps its punctuation.
pub fn split_strips(text: &str) -> Vec<String> {
    let mut strips = Vec::new();
    let mut start = 0;

    for m in STRIP_BOUNDARY.find_iter(text) {
        let terminator_len = text[m.start()..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(0);
        strips.push(&text[start..m.start() + terminator_len]);
        start = m.end();
    }
    strips.push(&text[start..]);

    strips
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Keeps only the strips of a document the scorer finds relevant
#[derive(Debug, Clone)]
pub struct KnowledgeRefiner {
    scorer: Arc<dyn RelevanceScorer>,
    strip_threshold: f32,
}

impl KnowledgeRefiner {
    pub fn new(scorer: Arc<dyn RelevanceScorer>, strip_threshold: f32) -> Self {
        Self {
            scorer,
            strip_threshold,
        }
    }

    /// Refine one document into the newline-joined strips scoring above the threshold.
    ///
    /// Returns an empty string when nothing survives.
    pub async fn refine(&self, query: &str, document: &str) -> String {
        let strips = split_strips(document);
        if strips.is_empty() {
            return String::new();
        }

        let results = self.scorer.score(query, &strips).await;

        let kept: Vec<&str> = strips
            .iter()
            .zip(&results)
            .filter(|(_, result)| result.score > self.strip_threshold)
            .map(|(strip, _)| strip.as_str())
            .collect();

        debug!(
            strips = strips.len(),
            kept = kept.len(),
            "Refined document"
        );

        kept.join("\n").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crag::MockRelevanceScorer;

    #[test]
    fn test_split_on_terminators() {
        let strips = split_strips("Rails are steel. Sleepers hold them!  Why? Gauge matters");
        assert_eq!(
            strips,
            vec![
                "Rails are steel.",
                "Sleepers hold them!",
                "Why?",
                "Gauge matters"
            ]
        );
    }

    #[test]
    fn test_split_requires_whitespace_after_terminator() {
        assert_eq!(split_strips("Version 1.5 is used."), vec!["Version 1.5 is used."]);
    }

    #[test]
    fn test_split_cjk_terminators() {
        let strips = split_strips("钢轨很重。 轨枕很多！ 对吗？ 是的");
        assert_eq!(strips, vec!["钢轨很重。", "轨枕很多！", "对吗？", "是的"]);
    }

    #[test]
    fn test_split_drops_empty_strips() {
        assert!(split_strips("   ").is_empty());
        assert_eq!(split_strips("  One.\n\n  Two.  "), vec!["One.", "Two."]);
    }

    #[tokio::test]
    async fn test_refine_keeps_positive_strips_in_order() {
        let scorer = MockRelevanceScorer::new()
            .with_score("A.", 0.6)
            .with_score("B.", -0.2)
            .with_score("C.", 0.1)
            .with_score("D.", 0.0);
        let refiner = KnowledgeRefiner::new(Arc::new(scorer), 0.0);

        let refined = refiner.refine("q", "A. B. C. D.").await;

        assert_eq!(refined, "A.\nC.");
    }

    #[tokio::test]
    async fn test_refine_returns_empty_when_nothing_survives() {
        let scorer = MockRelevanceScorer::new().with_default_score(-0.1);
        let refiner = KnowledgeRefiner::new(Arc::new(scorer), 0.0);

        assert_eq!(refiner.refine("q", "One. Two. Three.").await, "");
    }

    #[tokio::test]
    async fn test_refine_scores_all_strips_in_one_batch() {
        let scorer = Arc::new(MockRelevanceScorer::new().with_default_score(0.5));
        let refiner = KnowledgeRefiner::new(scorer.clone(), 0.0);

        refiner.refine("q", "One. Two. Three.").await;

        assert_eq!(scorer.call_count(), 1);
    }

    #[tokio::test]
    async fn test_refine_empty_document_skips_scoring() {
        let scorer = Arc::new(MockRelevanceScorer::new().with_default_score(0.5));
        let refiner = KnowledgeRefiner::new(scorer.clone(), 0.0);

        assert_eq!(refiner.refine("q", "  ").await, "");
        assert_eq!(scorer.call_count(), 0);
    }
}
