//! Ingest command - chunks a markdown file into the persisted knowledge base

use std::path::PathBuf;

use anyhow::bail;
use clap::Args;

use crate::config::AppConfig;

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Markdown file to ingest
    #[arg(long, short)]
    pub file: PathBuf,

    /// Store snapshot to update (defaults to `store.persist_path`)
    #[arg(long)]
    pub store: Option<PathBuf>,
}

pub async fn run(args: IngestArgs) -> anyhow::Result<()> {
    let mut config = super::prepare(None);
    apply_store_path(&mut config, args.store)?;

    let state = crate::create_app_state(&config).await?;
    let result = state.ingestion.ingest_file(&args.file).await?;
    state.persist().await?;

    println!(
        "Ingested {} chunks from {} into {}",
        result.chunks_added,
        result.source,
        config
            .store
            .persist_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    );

    Ok(())
}

/// Ingestion without a snapshot would be discarded on exit
fn apply_store_path(config: &mut AppConfig, store: Option<PathBuf>) -> anyhow::Result<()> {
    if store.is_some() {
        config.store.persist_path = store;
    }

    if config.store.persist_path.is_none() {
        bail!("ingest needs a store snapshot: pass --store or set store.persist_path");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_flag_overrides_config() {
        let mut config = AppConfig::default();
        config.store.persist_path = Some(PathBuf::from("configured.json"));

        apply_store_path(&mut config, Some(PathBuf::from("flag.json"))).unwrap();

        assert_eq!(
            config.store.persist_path,
            Some(PathBuf::from("flag.json"))
        );
    }

    #[test]
    fn test_missing_store_is_rejected() {
        let mut config = AppConfig::default();

        assert!(apply_store_path(&mut config, None).is_err());
    }
}
