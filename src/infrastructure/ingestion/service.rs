//! Markdown ingestion into a vector store

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::ingestion::{ChunkingStrategy, IngestionResult, SOURCE_KEY};
use crate::domain::{DomainError, VectorStore};

/// Splits markdown sources and upserts the chunks
#[derive(Debug, Clone)]
pub struct IngestionService {
    store: Arc<dyn VectorStore>,
    splitter: Arc<dyn ChunkingStrategy>,
}

impl IngestionService {
    pub fn new(store: Arc<dyn VectorStore>, splitter: Arc<dyn ChunkingStrategy>) -> Self {
        Self { store, splitter }
    }

    /// Ingest raw markdown under the given source name
    pub async fn ingest_markdown(
        &self,
        markdown: &str,
        source_name: &str,
    ) -> Result<IngestionResult, DomainError> {
        let chunks = self.splitter.chunk(markdown);

        if chunks.is_empty() {
            info!(source = source_name, "No chunks produced");
            return Ok(IngestionResult::new(source_name, 0));
        }

        let mut texts = Vec::with_capacity(chunks.len());
        let mut metadatas = Vec::with_capacity(chunks.len());
        let mut ids = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            let mut metadata = chunk.metadata;
            metadata.insert(SOURCE_KEY.to_string(), source_name.to_string());
            texts.push(chunk.content);
            metadatas.push(metadata);
            ids.push(Uuid::new_v4().to_string());
        }

        let added = self.store.upsert(texts, metadatas, ids).await?;

        info!(
            source = source_name,
            chunks = added,
            splitter = self.splitter.name(),
            "Ingested markdown"
        );

        Ok(IngestionResult::new(source_name, added))
    }

    /// Read a markdown file and ingest it under its file name
    pub async fn ingest_file(&self, path: &Path) -> Result<IngestionResult, DomainError> {
        let markdown = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::not_found(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        let source_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.ingest_markdown(&markdown, &source_name).await
    }
}
