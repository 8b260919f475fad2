//! LLM provider implementations

pub mod http_client;
mod openai;

pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::{DEFAULT_OPENAI_BASE_URL, OpenAiProvider};
