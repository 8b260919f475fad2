//! Per-query run state and the deltas that build it

use serde::{Deserialize, Serialize};

use super::action::CragAction;
use super::node::PipelineNode;
use crate::domain::DomainError;
use crate::domain::knowledge_base::Document;

/// Score of the retrieved document at the same position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEvaluation {
    pub document_id: String,
    pub score: f32,
    pub rationale: String,
}

/// Output of one pipeline step, touching only that step's fields
#[derive(Debug, Clone, PartialEq)]
pub enum StateDelta {
    Retrieved {
        documents: Vec<Document>,
    },
    Evaluated {
        evaluations: Vec<DocumentEvaluation>,
        action: CragAction,
    },
    Refined {
        knowledge_strips: Vec<String>,
    },
    Searched {
        search_results: Vec<String>,
    },
    Generated {
        final_context: String,
        final_answer: String,
    },
}

/// Accumulated state of one query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub question: String,
    pub retrieved_documents: Vec<Document>,
    /// Index-aligned with `retrieved_documents`
    pub evaluation_scores: Vec<DocumentEvaluation>,
    pub action: Option<CragAction>,
    pub knowledge_strips: Vec<String>,
    pub search_results: Vec<String>,
    pub final_context: Option<String>,
    pub final_answer: Option<String>,
    /// Nodes visited, in order
    pub trace: Vec<PipelineNode>,
}

impl RunState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }

    /// Merge a step's output into the state
    pub fn apply(&mut self, delta: StateDelta) -> Result<(), DomainError> {
        match delta {
            StateDelta::Retrieved { documents } => {
                self.retrieved_documents = documents;
            }
            StateDelta::Evaluated {
                evaluations,
                action,
            } => {
                if evaluations.len() != self.retrieved_documents.len() {
                    return Err(DomainError::contract(format!(
                        "{} evaluations for {} retrieved documents",
                        evaluations.len(),
                        self.retrieved_documents.len()
                    )));
                }
                self.evaluation_scores = evaluations;
                self.action = Some(action);
            }
            StateDelta::Refined { knowledge_strips } => {
                self.knowledge_strips = knowledge_strips;
            }
            StateDelta::Searched { search_results } => {
                self.search_results = search_results;
            }
            StateDelta::Generated {
                final_context,
                final_answer,
            } => {
                self.final_context = Some(final_context);
                self.final_answer = Some(final_answer);
            }
        }
        Ok(())
    }

    /// Scores in retrieval order
    pub fn scores(&self) -> Vec<f32> {
        self.evaluation_scores.iter().map(|e| e.score).collect()
    }

    /// Knowledge strips followed by search results, newline-joined
    pub fn compose_context(&self) -> String {
        self.knowledge_strips
            .iter()
            .chain(&self.search_results)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn answer(&self) -> &str {
        self.final_answer.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluation(id: &str, score: f32) -> DocumentEvaluation {
        DocumentEvaluation {
            document_id: id.to_string(),
            score,
            rationale: "test".to_string(),
        }
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = RunState::new("What gauge?");
        assert_eq!(state.question, "What gauge?");
        assert!(state.action.is_none());
        assert!(state.final_answer.is_none());
        assert!(state.trace.is_empty());
    }

    #[test]
    fn test_evaluation_keeps_duplicate_ids() {
        let mut state = RunState::new("q");
        state
            .apply(StateDelta::Retrieved {
                documents: vec![Document::new("same", "a"), Document::new("same", "b")],
            })
            .unwrap();
        state
            .apply(StateDelta::Evaluated {
                evaluations: vec![evaluation("same", 0.8), evaluation("same", -0.3)],
                action: CragAction::Correct,
            })
            .unwrap();

        assert_eq!(state.evaluation_scores.len(), 2);
        assert_eq!(state.scores(), vec![0.8, -0.3]);
        assert_eq!(state.action, Some(CragAction::Correct));
    }

    #[test]
    fn test_evaluation_length_mismatch_is_rejected() {
        let mut state = RunState::new("q");
        state
            .apply(StateDelta::Retrieved {
                documents: vec![Document::new("d1", "a")],
            })
            .unwrap();

        let result = state.apply(StateDelta::Evaluated {
            evaluations: vec![],
            action: CragAction::Ambiguous,
        });

        assert!(matches!(result, Err(DomainError::Contract { .. })));
        assert!(state.action.is_none());
    }

    #[test]
    fn test_compose_context_orders_strips_before_results() {
        let mut state = RunState::new("q");
        state
            .apply(StateDelta::Refined {
                knowledge_strips: vec!["strip".to_string()],
            })
            .unwrap();
        state
            .apply(StateDelta::Searched {
                search_results: vec!["web one".to_string(), "web two".to_string()],
            })
            .unwrap();

        assert_eq!(state.compose_context(), "strip\nweb one\nweb two");
    }
}
