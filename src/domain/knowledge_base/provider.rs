//! Retrieval and vector store traits

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// A retrievable passage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier for the document
    pub id: String,
    /// Document content text
    pub content: String,
    /// Key-value metadata (`path`, `source`, ...)
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Document {
    /// Create a new document
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Add metadata to the document
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Set all metadata
    pub fn with_all_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Similarity search over stored documents
#[async_trait]
pub trait Retriever: Send + Sync + Debug {
    /// Return up to `k` documents ordered by decreasing similarity to `query`
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Document>, DomainError>;

    /// Get the retriever name
    fn retriever_name(&self) -> &'static str;
}

/// A retriever that can also be written to
#[async_trait]
pub trait VectorStore: Retriever {
    /// Insert or replace documents keyed by id
    async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, DomainError>;

    /// Get the total document count
    async fn document_count(&self) -> Result<usize, DomainError>;

    /// Upsert parallel lists of texts, metadata and ids.
    ///
    /// The three lists must have equal length.
    async fn upsert(
        &self,
        texts: Vec<String>,
        metadatas: Vec<HashMap<String, String>>,
        ids: Vec<String>,
    ) -> Result<usize, DomainError> {
        if texts.len() != metadatas.len() || texts.len() != ids.len() {
            return Err(DomainError::contract(format!(
                "upsert requires equal lengths, got texts={}, metadatas={}, ids={}",
                texts.len(),
                metadatas.len(),
                ids.len()
            )));
        }

        let documents = texts
            .into_iter()
            .zip(metadatas)
            .zip(ids)
            .map(|((text, metadata), id)| Document::new(id, text).with_all_metadata(metadata))
            .collect();

        self.add_documents(documents).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingStore {
        added: Mutex<Vec<Document>>,
    }

    #[async_trait]
    impl Retriever for RecordingStore {
        async fn search(&self, _query: &str, _k: usize) -> Result<Vec<Document>, DomainError> {
            Ok(Vec::new())
        }

        fn retriever_name(&self) -> &'static str {
            "recording"
        }
    }

    #[async_trait]
    impl VectorStore for RecordingStore {
        async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, DomainError> {
            let count = documents.len();
            self.added.lock().unwrap().extend(documents);
            Ok(count)
        }

        async fn document_count(&self) -> Result<usize, DomainError> {
            Ok(self.added.lock().unwrap().len())
        }
    }

    #[tokio::test]
    async fn test_upsert_zips_parallel_lists() {
        let store = RecordingStore::default();
        let mut metadata = HashMap::new();
        metadata.insert("path".to_string(), "Intro".to_string());

        let added = store
            .upsert(
                vec!["hello".to_string()],
                vec![metadata],
                vec!["doc-1".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(added, 1);
        let docs = store.added.lock().unwrap();
        assert_eq!(docs[0].id, "doc-1");
        assert_eq!(docs[0].content, "hello");
        assert_eq!(docs[0].metadata.get("path").map(String::as_str), Some("Intro"));
    }

    #[tokio::test]
    async fn test_upsert_rejects_mismatched_lengths() {
        let store = RecordingStore::default();

        let result = store
            .upsert(
                vec!["a".to_string(), "b".to_string()],
                vec![HashMap::new()],
                vec!["1".to_string(), "2".to_string()],
            )
            .await;

        assert!(matches!(result, Err(DomainError::Contract { .. })));
        assert_eq!(store.document_count().await.unwrap(), 0);
    }
}
