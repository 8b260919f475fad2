//! Evaluation harness comparing the baseline against the corrective pipeline

mod benchmark;

pub use benchmark::{BenchmarkMethod, BenchmarkResult, BenchmarkRunner, ContextSource, render_table};
