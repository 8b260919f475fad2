//! Application state shared by the handlers

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::{DomainError, IngestionResult};
use crate::infrastructure::crag::CragPipeline;
use crate::infrastructure::ingestion::IngestionService;
use crate::infrastructure::knowledge_base::InMemoryVectorStore;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<CragPipeline>,
    pub ingestion: Arc<IngestionService>,
    pub store: Arc<InMemoryVectorStore>,
    /// Snapshot rewritten after each ingestion, when configured
    pub persist_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(
        pipeline: Arc<CragPipeline>,
        ingestion: Arc<IngestionService>,
        store: Arc<InMemoryVectorStore>,
    ) -> Self {
        Self {
            pipeline,
            ingestion,
            store,
            persist_path: None,
        }
    }

    pub fn with_persist_path(mut self, path: Option<PathBuf>) -> Self {
        self.persist_path = path;
        self
    }

    /// Ingest markdown and write the snapshot if one is configured
    pub async fn ingest_markdown(
        &self,
        markdown: &str,
        source_name: &str,
    ) -> Result<IngestionResult, DomainError> {
        let result = self.ingestion.ingest_markdown(markdown, source_name).await?;
        self.persist().await?;
        Ok(result)
    }

    /// Write the store snapshot; a no-op without a persist path
    pub async fn persist(&self) -> Result<(), DomainError> {
        match &self.persist_path {
            Some(path) => self.store.save_snapshot(path).await,
            None => Ok(()),
        }
    }
}
