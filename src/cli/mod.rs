//! CLI module for Rail CRAG
//!
//! Provides subcommands:
//! - `serve`: HTTP API server
//! - `ask`: answer a single question and print the run as JSON
//! - `ingest`: chunk a markdown file into the persisted knowledge base
//! - `benchmark`: compare plain retrieval against the corrective pipeline

pub mod ask;
pub mod benchmark;
pub mod ingest;
pub mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Rail CRAG - corrective retrieval-augmented question answering
#[derive(Parser)]
#[command(name = "rail-crag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve(serve::ServeArgs),

    /// Answer one question
    Ask(ask::AskArgs),

    /// Ingest a markdown file into the store snapshot
    Ingest(ingest::IngestArgs),

    /// Compare plain retrieval against the corrective pipeline
    Benchmark(benchmark::BenchmarkArgs),
}

/// Load configuration, apply a command-line seed file and start logging
fn prepare(seed: Option<PathBuf>) -> AppConfig {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().unwrap_or_default();

    if seed.is_some() {
        config.store.seed_file = seed;
    }

    logging::init_logging(&config.logging);
    config
}
