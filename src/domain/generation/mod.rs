//! Answer generation and query rewriting traits

mod generator;

pub use generator::{AnswerGenerator, QueryRewriter};

#[cfg(test)]
pub use generator::mock::{MockAnswerGenerator, MockQueryRewriter};
