//! Domain layer - Core business logic and entities

pub mod call_policy;
pub mod cancellation;
pub mod crag;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod knowledge_base;
pub mod llm;
pub mod web_search;

pub use call_policy::{CallPolicy, RetryConfig};
pub use cancellation::CancellationToken;
pub use crag::{
    CragAction, CragConfig, DocumentEvaluation, EvaluationResult, KnowledgeRefiner,
    PipelineNode, RelevanceJudgement, RelevanceScorer, RunState, ScoringBackend, StateDelta,
    classify,
};
pub use error::DomainError;
pub use generation::{AnswerGenerator, QueryRewriter};
pub use ingestion::{Chunk, ChunkingStrategy, IngestionResult};
pub use knowledge_base::{Document, Retriever, VectorStore};
pub use llm::{
    FinishReason, LlmJsonSchema, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse,
    LlmResponseFormat, Message, MessageRole, Usage,
};
pub use web_search::WebSearcher;
