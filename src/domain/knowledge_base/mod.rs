//! Knowledge base domain: documents, retrieval and storage traits

mod provider;

pub use provider::{Document, Retriever, VectorStore};

#[cfg(test)]
pub use provider::mock::MockRetriever;
