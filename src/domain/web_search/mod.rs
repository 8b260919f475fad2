//! Web search domain trait

mod searcher;

pub use searcher::WebSearcher;

#[cfg(test)]
pub use searcher::mock::MockWebSearcher;
