//! Markdown ingestion endpoint

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};

#[derive(Debug, Clone, Deserialize)]
pub struct IngestRequest {
    pub markdown_content: String,
    #[serde(default = "default_source_name")]
    pub source_name: String,
}

fn default_source_name() -> String {
    "api_upload".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
    pub chunks_added: usize,
}

/// POST /ingest
pub async fn ingest(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, ApiError> {
    let result = state
        .ingest_markdown(&request.markdown_content, &request.source_name)
        .await?;

    Ok(Json(IngestResponse {
        status: "success",
        chunks_added: result.chunks_added,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_name_defaults() {
        let request: IngestRequest =
            serde_json::from_str(r##"{"markdown_content": "# A\nbody"}"##).unwrap();
        assert_eq!(request.source_name, "api_upload");
    }
}
