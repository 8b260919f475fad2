//! Document ingestion domain types and traits

pub mod chunker;
pub mod pipeline;

pub use chunker::{Chunk, ChunkingStrategy, PATH_KEY, SOURCE_KEY};
pub use pipeline::IngestionResult;
