//! Document ingestion implementations

mod markdown;
mod service;

pub use markdown::{MarkdownHierarchySplitter, PATH_SEPARATOR};
pub use service::IngestionService;
