//! In-memory vector store with optional JSON snapshots

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::embedding::{HashEmbedder, cosine_similarity};
use crate::domain::knowledge_base::{Document, Retriever, VectorStore};
use crate::domain::DomainError;

/// Vector store keeping documents and their hash embeddings in memory
#[derive(Debug, Clone)]
pub struct InMemoryVectorStore {
    embedder: HashEmbedder,
    documents: Arc<RwLock<Vec<StoredDoc>>>,
}

#[derive(Debug, Clone)]
struct StoredDoc {
    document: Document,
    embedding: Vec<f32>,
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new(HashEmbedder::default())
    }
}

impl InMemoryVectorStore {
    pub fn new(embedder: HashEmbedder) -> Self {
        Self {
            embedder,
            documents: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self::new(HashEmbedder::new(dimensions))
    }

    /// Load documents from a snapshot written by [`save_snapshot`](Self::save_snapshot).
    ///
    /// A missing file is an empty snapshot. Embeddings are recomputed on load.
    pub async fn load_snapshot(&self, path: &Path) -> Result<usize, DomainError> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(DomainError::internal(format!(
                    "Cannot read snapshot '{}': {}",
                    path.display(),
                    e
                )));
            }
        };

        let documents: Vec<Document> = serde_json::from_str(&raw).map_err(|e| {
            DomainError::internal(format!("Invalid snapshot '{}': {}", path.display(), e))
        })?;

        let loaded = self.add_documents(documents).await?;
        info!(path = %path.display(), documents = loaded, "Loaded store snapshot");

        Ok(loaded)
    }

    /// Write every stored document to `path` as JSON
    pub async fn save_snapshot(&self, path: &Path) -> Result<(), DomainError> {
        let documents: Vec<Document> = self
            .documents
            .read()
            .await
            .iter()
            .map(|stored| stored.document.clone())
            .collect();

        let json = serde_json::to_string_pretty(&documents)
            .map_err(|e| DomainError::internal(format!("Cannot encode snapshot: {}", e)))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::internal(format!("Cannot create '{}': {}", parent.display(), e))
            })?;
        }

        tokio::fs::write(path, json).await.map_err(|e| {
            DomainError::internal(format!("Cannot write snapshot '{}': {}", path.display(), e))
        })?;

        info!(path = %path.display(), documents = documents.len(), "Saved store snapshot");
        Ok(())
    }
}

#[async_trait]
impl Retriever for InMemoryVectorStore {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Document>, DomainError> {
        let query_embedding = self.embedder.embed(query);
        let docs = self.documents.read().await;

        let mut scored: Vec<(f32, &StoredDoc)> = docs
            .iter()
            .map(|doc| (cosine_similarity(&query_embedding, &doc.embedding), doc))
            .collect();

        // stable sort keeps insertion order among ties
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let results: Vec<Document> = scored
            .into_iter()
            .take(k)
            .map(|(_, doc)| doc.document.clone())
            .collect();

        debug!(k, returned = results.len(), "In-memory search");
        Ok(results)
    }

    fn retriever_name(&self) -> &'static str {
        "in_memory"
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, DomainError> {
        let mut docs = self.documents.write().await;
        let count = documents.len();

        for document in documents {
            let embedding = self.embedder.embed(&document.content);
            let stored = StoredDoc {
                document,
                embedding,
            };

            match docs.iter_mut().find(|d| d.document.id == stored.document.id) {
                Some(existing) => *existing = stored,
                None => docs.push(stored),
            }
        }

        Ok(count)
    }

    async fn document_count(&self) -> Result<usize, DomainError> {
        Ok(self.documents.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    async fn seeded_store() -> InMemoryVectorStore {
        let store = InMemoryVectorStore::default();
        store
            .add_documents(vec![
                Document::new("gauge", "standard track gauge is 1435 mm"),
                Document::new("canteen", "the canteen opens at noon"),
                Document::new("sleepers", "concrete sleepers support the track"),
            ])
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let store = seeded_store().await;

        let results = store.search("track gauge", 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "gauge");
    }

    #[tokio::test]
    async fn test_exact_text_ranks_first() {
        let store = seeded_store().await;

        let results = store
            .search("concrete sleepers support the track", 1)
            .await
            .unwrap();

        assert_eq!(results[0].id, "sleepers");
    }

    #[tokio::test]
    async fn test_search_limits_to_k() {
        let store = seeded_store().await;

        assert_eq!(store.search("track", 1).await.unwrap().len(), 1);
        assert_eq!(store.search("track", 10).await.unwrap().len(), 3);
        assert!(store.search("track", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_store_returns_nothing() {
        let store = InMemoryVectorStore::with_dimensions(32);
        assert!(store.search("anything", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_ids() {
        let store = seeded_store().await;

        let mut metadata = HashMap::new();
        metadata.insert("source".to_string(), "manual.md".to_string());
        store
            .upsert(
                vec!["updated gauge text".to_string()],
                vec![metadata],
                vec!["gauge".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(store.document_count().await.unwrap(), 3);
        let results = store.search("updated gauge text", 1).await.unwrap();
        assert_eq!(results[0].content, "updated gauge text");
        assert_eq!(
            results[0].metadata.get("source").map(String::as_str),
            Some("manual.md")
        );
    }

    fn snapshot_path() -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("rail-crag-{}", uuid::Uuid::new_v4()))
            .join("store.json")
    }

    #[tokio::test]
    async fn test_snapshot_survives_new_store() {
        let path = snapshot_path();
        seeded_store().await.save_snapshot(&path).await.unwrap();

        let reopened = InMemoryVectorStore::default();
        assert_eq!(reopened.load_snapshot(&path).await.unwrap(), 3);

        let results = reopened
            .search("concrete sleepers support the track", 1)
            .await
            .unwrap();
        assert_eq!(results[0].id, "sleepers");

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_missing_snapshot_loads_nothing() {
        let store = InMemoryVectorStore::default();

        assert_eq!(store.load_snapshot(&snapshot_path()).await.unwrap(), 0);
        assert_eq!(store.document_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_an_error() {
        let path = snapshot_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let result = InMemoryVectorStore::default().load_snapshot(&path).await;
        assert!(matches!(result, Err(DomainError::Internal { .. })));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_upsert_length_mismatch_writes_nothing() {
        let store = InMemoryVectorStore::default();

        let result = store
            .upsert(vec!["a".to_string()], vec![], vec!["1".to_string()])
            .await;

        assert!(matches!(result, Err(DomainError::Contract { .. })));
        assert_eq!(store.document_count().await.unwrap(), 0);
    }
}
