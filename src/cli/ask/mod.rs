//! Ask command - answers one question and prints the run

use std::path::PathBuf;

use clap::Args;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question to answer
    #[arg(long, short)]
    pub query: String,

    /// Markdown file to load into the knowledge base first
    #[arg(long)]
    pub seed: Option<PathBuf>,
}

pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let config = super::prepare(args.seed);

    let state = crate::create_app_state(&config).await?;
    let run = state.pipeline.run(&args.query).await?;

    println!("{}", serde_json::to_string_pretty(&run)?);

    Ok(())
}
