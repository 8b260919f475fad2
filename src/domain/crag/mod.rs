//! CRAG (Corrective RAG) domain
//!
//! Relevance scoring, action classification, knowledge refinement and the
//! routing table that sequences them into a single run.

mod action;
mod config;
mod node;
mod refiner;
mod scorer;
mod state;

pub use action::{CragAction, classify};
pub use config::CragConfig;
pub use node::PipelineNode;
pub use refiner::{KnowledgeRefiner, split_strips};
pub use scorer::{EvaluationResult, RelevanceJudgement, RelevanceScorer, ScoringBackend};
pub use state::{DocumentEvaluation, RunState, StateDelta};

#[cfg(test)]
pub use scorer::mock::{MockRelevanceScorer, MockScoringBackend};
