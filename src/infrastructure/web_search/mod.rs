//! Web search implementations

mod tavily;

pub use tavily::{DEFAULT_TAVILY_BASE_URL, TavilySearcher};
