//! Corrective action taken after evaluating retrieval quality

use serde::{Deserialize, Serialize};

/// Verdict over the whole retrieved set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CragAction {
    /// At least one document is clearly relevant; use internal knowledge
    Correct,
    /// Every document is clearly irrelevant; use web search instead
    Incorrect,
    /// Evidence is mixed; use both
    Ambiguous,
}

impl CragAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
            Self::Ambiguous => "ambiguous",
        }
    }
}

impl std::fmt::Display for CragAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map per-document scores to an action.
///
/// Precedence: empty input is ambiguous, then any score above `upper` is correct,
/// then all scores below `lower` is incorrect, otherwise ambiguous.
pub fn classify(scores: &[f32], upper: f32, lower: f32) -> CragAction {
    if scores.is_empty() {
        return CragAction::Ambiguous;
    }

    if scores.iter().any(|&s| s > upper) {
        return CragAction::Correct;
    }

    if scores.iter().all(|&s| s < lower) {
        return CragAction::Incorrect;
    }

    CragAction::Ambiguous
}
