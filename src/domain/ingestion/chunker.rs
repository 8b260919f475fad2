//! Chunking strategy trait and types

use std::collections::HashMap;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Metadata key holding the heading path of a chunk
pub const PATH_KEY: &str = "path";
/// Metadata key holding the source name of a chunk
pub const SOURCE_KEY: &str = "source";

/// A chunk of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk content
    pub content: String,
    /// Chunk metadata (`path`, `source`, ...)
    pub metadata: HashMap<String, String>,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Heading path, empty for content before the first heading
    pub fn path(&self) -> &str {
        self.metadata.get(PATH_KEY).map(String::as_str).unwrap_or_default()
    }
}

/// Strategy for splitting a document into chunks
pub trait ChunkingStrategy: Send + Sync + Debug {
    /// Split content into chunks
    fn chunk(&self, content: &str) -> Vec<Chunk>;

    /// Get the strategy name
    fn name(&self) -> &'static str;
}
