//! API layer - HTTP endpoints

pub mod chat;
pub mod health;
pub mod ingest;
pub mod router;
pub mod state;
pub mod types;

pub use router::create_router;
pub use state::AppState;
