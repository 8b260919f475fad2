//! Ingestion result types

use serde::{Deserialize, Serialize};

/// Outcome of ingesting one markdown source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionResult {
    /// Source name stored on every chunk
    pub source: String,
    /// Chunks written to the store
    pub chunks_added: usize,
}

impl IngestionResult {
    pub fn new(source: impl Into<String>, chunks_added: usize) -> Self {
        Self {
            source: source.into(),
            chunks_added,
        }
    }
}
