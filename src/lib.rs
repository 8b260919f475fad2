//! Rail CRAG
//!
//! Corrective retrieval-augmented generation over a markdown knowledge base:
//! - Relevance scoring of retrieved passages with a three-way routing decision
//! - Sentence-level knowledge refinement
//! - Web search fallback with query rewriting
//! - Markdown ingestion into an in-memory vector store

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use api::state::AppState;
use domain::{LlmProvider, RelevanceScorer, Retriever, VectorStore};
use infrastructure::{
    crag::{BackedRelevanceScorer, CragPipeline, LexicalRelevanceScorer, LlmScoringBackend},
    generation::{LlmAnswerGenerator, LlmQueryRewriter},
    ingestion::{IngestionService, MarkdownHierarchySplitter},
    knowledge_base::InMemoryVectorStore,
    llm::{HttpClient, OpenAiProvider},
    web_search::TavilySearcher,
};

/// Build the pipeline and ingestion service from configuration
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    config.validate()?;

    let store = Arc::new(InMemoryVectorStore::with_dimensions(
        config.store.embedding_dimensions,
    ));
    let retriever: Arc<dyn Retriever> = store.clone();
    let vector_store: Arc<dyn VectorStore> = store.clone();

    if let Some(path) = &config.store.persist_path {
        store.load_snapshot(path).await?;
    }

    let http_client = HttpClient::with_timeout(Duration::from_millis(config.llm.timeout_ms))?;

    let searcher = TavilySearcher::with_base_url(
        http_client.clone(),
        config.web_search.api_key.clone(),
        &config.web_search.base_url,
    );

    let pipeline = match config.llm.api_key() {
        Some(api_key) => {
            let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::with_base_url(
                http_client,
                api_key,
                &config.llm.base_url,
            ));

            let backend = LlmScoringBackend::new(provider.clone(), &config.llm.eval_model);
            let scorer: Arc<dyn RelevanceScorer> = Arc::new(BackedRelevanceScorer::new(
                Arc::new(backend),
                config.crag.call_policy(),
                config.crag.max_concurrency,
            ));

            info!(
                eval_model = %config.llm.eval_model,
                gen_model = %config.llm.gen_model,
                "Using LLM scoring and generation"
            );

            CragPipeline::new(retriever, scorer, config.crag.clone())
                .with_generator(Arc::new(LlmAnswerGenerator::new(
                    provider.clone(),
                    &config.llm.gen_model,
                )))
                .with_rewriter(Arc::new(LlmQueryRewriter::new(
                    provider,
                    &config.llm.rewrite_model,
                )))
        }
        None => {
            warn!("No LLM API key configured, using lexical scoring and context passthrough");
            CragPipeline::new(
                retriever,
                Arc::new(LexicalRelevanceScorer::new()),
                config.crag.clone(),
            )
        }
    }
    .with_web_searcher(Arc::new(searcher));

    let ingestion = IngestionService::new(
        vector_store,
        Arc::new(MarkdownHierarchySplitter::new()),
    );

    if let Some(seed_file) = &config.store.seed_file {
        let result = ingestion.ingest_file(seed_file).await?;
        info!(
            source = %result.source,
            chunks = result.chunks_added,
            "Seeded knowledge base"
        );
    }

    Ok(
        AppState::new(Arc::new(pipeline), Arc::new(ingestion), store)
            .with_persist_path(config.store.persist_path.clone()),
    )
}
