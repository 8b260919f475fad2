//! LLM-backed answer generation and query rewriting

mod llm_generator;
mod llm_rewriter;

pub use llm_generator::LlmAnswerGenerator;
pub use llm_rewriter::LlmQueryRewriter;
