use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::chat;
use super::health;
use super::ingest;
use super::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/chat", post(chat::chat))
        .route("/ingest", post(ingest::ingest))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
