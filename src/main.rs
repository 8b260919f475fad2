use clap::Parser;
use rail_crag::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => cli::serve::run(args).await,
        Command::Ask(args) => cli::ask::run(args).await,
        Command::Ingest(args) => cli::ingest::run(args).await,
        Command::Benchmark(args) => cli::benchmark::run(args).await,
    }
}
