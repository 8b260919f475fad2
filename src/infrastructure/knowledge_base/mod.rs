//! Knowledge base implementations

mod embedding;
mod in_memory;

pub use embedding::{DEFAULT_EMBEDDING_DIMENSIONS, HashEmbedder, cosine_similarity};
pub use in_memory::InMemoryVectorStore;
