//! Question answering endpoint

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{CragAction, RunState};

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub action: Option<CragAction>,
    /// Mirrors `action`
    pub context_source: Option<CragAction>,
    pub knowledge_strips: Vec<String>,
    pub search_results: Vec<String>,
    /// Knowledge strips followed by web results
    pub steps: Vec<String>,
}

impl From<RunState> for ChatResponse {
    fn from(state: RunState) -> Self {
        let steps = state
            .knowledge_strips
            .iter()
            .chain(state.search_results.iter())
            .cloned()
            .collect();

        Self {
            answer: state.answer().to_string(),
            action: state.action,
            context_source: state.action,
            knowledge_strips: state.knowledge_strips,
            search_results: state.search_results,
            steps,
        }
    }
}

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let query = request.query.trim();

    if query.is_empty() {
        return Err(ApiError::bad_request("Query cannot be empty").with_param("query"));
    }

    let run = state.pipeline.run(query).await?;

    info!(
        action = ?run.action,
        strips = run.knowledge_strips.len(),
        search_results = run.search_results.len(),
        "Answered chat query"
    );

    Ok(Json(ChatResponse::from(run)))
}
