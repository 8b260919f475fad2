//! CRAG pipeline implementation
//!
//! Drives a single query through retrieve, evaluate, refine, search and generate,
//! merging each step's delta into the run state and routing on the action.

use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span, warn};

use crate::domain::crag::{
    CragConfig, DocumentEvaluation, KnowledgeRefiner, PipelineNode, RelevanceScorer, RunState,
    StateDelta,
};
use crate::domain::{
    AnswerGenerator, CallPolicy, CancellationToken, DomainError, QueryRewriter, Retriever,
    WebSearcher,
};

/// Corrective-retrieval orchestrator
#[derive(Debug, Clone)]
pub struct CragPipeline {
    retriever: Arc<dyn Retriever>,
    scorer: Arc<dyn RelevanceScorer>,
    refiner: KnowledgeRefiner,
    web_searcher: Option<Arc<dyn WebSearcher>>,
    rewriter: Option<Arc<dyn QueryRewriter>>,
    generator: Option<Arc<dyn AnswerGenerator>>,
    config: CragConfig,
    policy: CallPolicy,
}

impl CragPipeline {
    /// Create a new CRAG pipeline
    pub fn new(
        retriever: Arc<dyn Retriever>,
        scorer: Arc<dyn RelevanceScorer>,
        config: CragConfig,
    ) -> Self {
        let refiner = KnowledgeRefiner::new(scorer.clone(), config.strip_threshold);
        let policy = config.call_policy();

        Self {
            retriever,
            scorer,
            refiner,
            web_searcher: None,
            rewriter: None,
            generator: None,
            config,
            policy,
        }
    }

    pub fn with_web_searcher(mut self, searcher: Arc<dyn WebSearcher>) -> Self {
        self.web_searcher = Some(searcher);
        self
    }

    pub fn with_rewriter(mut self, rewriter: Arc<dyn QueryRewriter>) -> Self {
        self.rewriter = Some(rewriter);
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn AnswerGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn config(&self) -> &CragConfig {
        &self.config
    }

    pub fn retriever(&self) -> &Arc<dyn Retriever> {
        &self.retriever
    }

    pub fn generator(&self) -> Option<&Arc<dyn AnswerGenerator>> {
        self.generator.as_ref()
    }

    /// Answer a question
    pub async fn run(&self, question: &str) -> Result<RunState, DomainError> {
        self.run_with_cancellation(question, &CancellationToken::new())
            .await
    }

    /// Answer a question, abandoning the in-flight step if `cancellation` fires
    pub async fn run_with_cancellation(
        &self,
        question: &str,
        cancellation: &CancellationToken,
    ) -> Result<RunState, DomainError> {
        let span = info_span!("crag_run", question = %question);

        async move {
            let mut state = RunState::new(question);
            let mut node = PipelineNode::START;

            while !node.is_terminal() {
                if cancellation.is_cancelled() {
                    warn!(step = node.as_str(), "Run cancelled");
                    return Err(DomainError::Cancelled);
                }

                state.trace.push(node);

                let delta = tokio::select! {
                    biased;
                    _ = cancellation.cancelled() => {
                        warn!(step = node.as_str(), "Run cancelled during step");
                        return Err(DomainError::Cancelled);
                    }
                    delta = self.execute(node, &state) => delta?,
                };

                state.apply(delta)?;
                node = node.next(state.action)?;
            }

            info!(
                action = ?state.action,
                strips = state.knowledge_strips.len(),
                search_results = state.search_results.len(),
                "Run complete"
            );

            Ok(state)
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, node: PipelineNode, state: &RunState) -> Result<StateDelta, DomainError> {
        match node {
            PipelineNode::Retrieve => Ok(self.retrieve(state).await),
            PipelineNode::Evaluate => self.evaluate(state).await,
            PipelineNode::Refine => Ok(self.refine(state).await),
            PipelineNode::Search => Ok(self.search(state).await),
            PipelineNode::Generate => Ok(self.generate(state).await),
            PipelineNode::End => Err(DomainError::contract("the end node has no step")),
        }
    }

    async fn retrieve(&self, state: &RunState) -> StateDelta {
        info!(step = "retrieve", k = self.config.retriever_k, "Running step");

        let documents = match self
            .policy
            .run("retrieve", || {
                self.retriever.search(&state.question, self.config.retriever_k)
            })
            .await
        {
            Ok(documents) => documents,
            Err(e) => {
                warn!(
                    retriever = self.retriever.retriever_name(),
                    error = %e,
                    "Retrieval failed, continuing with no documents"
                );
                Vec::new()
            }
        };

        debug!(count = documents.len(), "Retrieved documents");
        StateDelta::Retrieved { documents }
    }

    async fn evaluate(&self, state: &RunState) -> Result<StateDelta, DomainError> {
        info!(step = "evaluate", documents = state.retrieved_documents.len(), "Running step");

        let contents: Vec<String> = state
            .retrieved_documents
            .iter()
            .map(|doc| doc.content.clone())
            .collect();

        let results = self.scorer.score(&state.question, &contents).await;

        if results.len() != contents.len() {
            return Err(DomainError::contract(format!(
                "scorer '{}' returned {} results for {} documents",
                self.scorer.scorer_name(),
                results.len(),
                contents.len()
            )));
        }

        let evaluations: Vec<DocumentEvaluation> = state
            .retrieved_documents
            .iter()
            .zip(results)
            .map(|(doc, result)| DocumentEvaluation {
                document_id: doc.id.clone(),
                score: result.score,
                rationale: result.rationale,
            })
            .collect();

        let scores: Vec<f32> = evaluations.iter().map(|e| e.score).collect();
        let action = self.config.classify(&scores);

        info!(action = action.as_str(), ?scores, "Evaluated retrieval");

        Ok(StateDelta::Evaluated {
            evaluations,
            action,
        })
    }

    async fn refine(&self, state: &RunState) -> StateDelta {
        info!(step = "refine", "Running step");

        let mut knowledge_strips = Vec::new();

        for doc in &state.retrieved_documents {
            if doc.content.is_empty() {
                continue;
            }

            let refined = self.refiner.refine(&state.question, &doc.content).await;
            if !refined.is_empty() {
                knowledge_strips.push(refined);
            }
        }

        debug!(kept = knowledge_strips.len(), "Refined knowledge");
        StateDelta::Refined { knowledge_strips }
    }

    async fn search(&self, state: &RunState) -> StateDelta {
        info!(step = "search", "Running step");

        let query = self.rewrite_query(&state.question).await;

        let Some(searcher) = &self.web_searcher else {
            warn!("No web searcher configured, skipping web search");
            return StateDelta::Searched {
                search_results: Vec::new(),
            };
        };

        let search_results = match self
            .policy
            .run("web_search", || searcher.search(&query, self.config.search_k))
            .await
        {
            Ok(results) => results,
            Err(e) => {
                warn!(
                    searcher = searcher.searcher_name(),
                    error = %e,
                    "Web search failed, continuing with no results"
                );
                Vec::new()
            }
        };

        debug!(query = %query, count = search_results.len(), "Web search complete");
        StateDelta::Searched { search_results }
    }

    async fn rewrite_query(&self, question: &str) -> String {
        let Some(rewriter) = &self.rewriter else {
            return question.to_string();
        };

        match self.policy.run("rewrite", || rewriter.rewrite(question)).await {
            Ok(rewritten) if !rewritten.trim().is_empty() => rewritten.trim().to_string(),
            Ok(_) => question.to_string(),
            Err(e) => {
                warn!(
                    rewriter = rewriter.rewriter_name(),
                    error = %e,
                    "Query rewrite failed, using original question"
                );
                question.to_string()
            }
        }
    }

    async fn generate(&self, state: &RunState) -> StateDelta {
        info!(step = "generate", "Running step");

        let final_context = state.compose_context();

        let final_answer = match &self.generator {
            None => final_context.clone(),
            Some(generator) => match self
                .policy
                .run("generate", || generator.generate(&state.question, &final_context))
                .await
            {
                Ok(answer) => answer,
                Err(e) => {
                    warn!(
                        generator = generator.generator_name(),
                        error = %e,
                        "Generation failed, returning context as answer"
                    );
                    final_context.clone()
                }
            },
        };

        StateDelta::Generated {
            final_context,
            final_answer,
        }
    }
}
