//! Infrastructure layer - External service implementations

pub mod crag;
pub mod evaluation;
pub mod generation;
pub mod ingestion;
pub mod knowledge_base;
pub mod llm;
pub mod logging;
pub mod web_search;
