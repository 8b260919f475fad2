//! Side-by-side comparison of plain retrieve-then-generate and the corrective pipeline

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{CragAction, DomainError};
use crate::infrastructure::crag::CragPipeline;

/// How an answer was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BenchmarkMethod {
    #[serde(rename = "Standard RAG")]
    StandardRag,
    #[serde(rename = "CRAG")]
    Crag,
}

impl BenchmarkMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StandardRag => "Standard RAG",
            Self::Crag => "CRAG",
        }
    }
}

/// Where the answer's context came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContextSource {
    #[serde(rename = "Internal DB Only")]
    InternalOnly,
    #[serde(rename = "Internal")]
    Internal,
    #[serde(rename = "Web Search")]
    WebSearch,
    #[serde(rename = "Hybrid")]
    Hybrid,
}

impl ContextSource {
    /// Context source implied by the routing decision
    pub fn from_action(action: Option<CragAction>) -> Self {
        match action {
            Some(CragAction::Incorrect) => Self::WebSearch,
            Some(CragAction::Ambiguous) => Self::Hybrid,
            Some(CragAction::Correct) | None => Self::Internal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InternalOnly => "Internal DB Only",
            Self::Internal => "Internal",
            Self::WebSearch => "Web Search",
            Self::Hybrid => "Hybrid",
        }
    }
}

/// One question answered by one method
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    pub question: String,
    pub method: BenchmarkMethod,
    /// `"Action: CORRECT"` for the pipeline, `"N/A"` for the baseline
    pub action_log: String,
    /// Nodes visited, empty for the baseline
    pub trace: Vec<String>,
    pub context_source: ContextSource,
    pub answer: String,
    pub latency_ms: u64,
}

/// Runs each question through the baseline and the pipeline, sharing collaborators
#[derive(Debug, Clone)]
pub struct BenchmarkRunner {
    pipeline: Arc<CragPipeline>,
}

impl BenchmarkRunner {
    pub fn new(pipeline: Arc<CragPipeline>) -> Self {
        Self { pipeline }
    }

    /// Retrieve then generate, with no evaluation, refinement or search
    pub async fn run_standard_rag(&self, question: &str) -> BenchmarkResult {
        let started = Instant::now();
        let k = self.pipeline.config().retriever_k;

        let documents = match self.pipeline.retriever().search(question, k).await {
            Ok(documents) => documents,
            Err(e) => {
                warn!(error = %e, "Baseline retrieval failed, continuing with no documents");
                Vec::new()
            }
        };

        let context = documents
            .iter()
            .map(|doc| doc.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let answer = match self.pipeline.generator() {
            None => context,
            Some(generator) => match generator.generate(question, &context).await {
                Ok(answer) => answer,
                Err(e) => {
                    warn!(error = %e, "Baseline generation failed, returning context");
                    context
                }
            },
        };

        BenchmarkResult {
            question: question.to_string(),
            method: BenchmarkMethod::StandardRag,
            action_log: "N/A".to_string(),
            trace: Vec::new(),
            context_source: ContextSource::InternalOnly,
            answer,
            latency_ms: started.elapsed().as_millis() as u64,
        }
    }

    pub async fn run_crag(&self, question: &str) -> Result<BenchmarkResult, DomainError> {
        let started = Instant::now();
        let run = self.pipeline.run(question).await?;

        let action_log = run
            .action
            .map(|action| format!("Action: {}", action.as_str().to_uppercase()))
            .unwrap_or_default();

        Ok(BenchmarkResult {
            question: question.to_string(),
            method: BenchmarkMethod::Crag,
            action_log,
            trace: run.trace.iter().map(|node| node.as_str().to_string()).collect(),
            context_source: ContextSource::from_action(run.action),
            answer: run.answer().to_string(),
            latency_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Baseline row then pipeline row for every question
    pub async fn compare(&self, questions: &[String]) -> Result<Vec<BenchmarkResult>, DomainError> {
        let mut results = Vec::with_capacity(questions.len() * 2);

        for question in questions {
            info!(question = %question, "Benchmarking");
            results.push(self.run_standard_rag(question).await);
            results.push(self.run_crag(question).await?);
        }

        Ok(results)
    }
}

/// Render results as a markdown table
pub fn render_table(results: &[BenchmarkResult]) -> String {
    let mut table = String::from(
        "| question | method | action_log | context_source | answer | latency_ms |\n\
         |---|---|---|---|---|---|\n",
    );

    for result in results {
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            cell(&result.question),
            result.method.as_str(),
            cell(&result.action_log),
            result.context_source.as_str(),
            cell(&result.answer),
            result.latency_ms
        ));
    }

    table
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
