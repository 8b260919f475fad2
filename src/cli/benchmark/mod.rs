//! Benchmark command - runs questions through the baseline and the pipeline

use std::path::PathBuf;

use clap::Args;

use crate::infrastructure::evaluation::{BenchmarkRunner, render_table};

const DEFAULT_QUESTIONS: [&str; 3] = [
    "What is the standard gauge width for railways?",
    "What are the construction specifications for the Hyperloop on Mars?",
    "Tell me about the track requirements defined in section 1.1.",
];

#[derive(Args, Debug)]
pub struct BenchmarkArgs {
    /// Question to benchmark, repeatable
    #[arg(long, short)]
    pub question: Vec<String>,

    /// Markdown file to load into the knowledge base first
    #[arg(long)]
    pub seed: Option<PathBuf>,

    /// Print JSON instead of a markdown table
    #[arg(long)]
    pub json: bool,
}

impl BenchmarkArgs {
    fn questions(&self) -> Vec<String> {
        if self.question.is_empty() {
            DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect()
        } else {
            self.question.clone()
        }
    }
}

pub async fn run(args: BenchmarkArgs) -> anyhow::Result<()> {
    let questions = args.questions();
    let config = super::prepare(args.seed);

    let state = crate::create_app_state(&config).await?;
    let runner = BenchmarkRunner::new(state.pipeline.clone());
    let results = runner.compare(&questions).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", render_table(&results));
    }

    Ok(())
}
