//! CRAG infrastructure: scorers, the LLM judge and the pipeline orchestrator

mod backed_scorer;
mod lexical_scorer;
mod llm_judge;
mod pipeline;

pub use backed_scorer::BackedRelevanceScorer;
pub use lexical_scorer::LexicalRelevanceScorer;
pub use llm_judge::LlmScoringBackend;
pub use pipeline::CragPipeline;
