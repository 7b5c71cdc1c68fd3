use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trivia_common::{Config, SourceKind};
use trivia_ingest::{Aggregator, SnapshotStore};

/// Parse the hand-authored source documents into a fresh snapshot.
#[derive(Parser)]
#[command(name = "trivia-ingest")]
#[command(version)]
struct Cli {
    /// Directory holding the source documents (overrides TRIVIA_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Snapshot output path (overrides TRIVIA_SNAPSHOT_PATH)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Label attached to the events section (overrides TRIVIA_EVENTS_LABEL)
    #[arg(long)]
    events_label: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("trivia=info".parse()?))
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        if cli.out.is_none() && std::env::var("TRIVIA_SNAPSHOT_PATH").is_err() {
            config.snapshot_path = dir.join("trivia_data.json");
        }
        config.data_dir = dir;
    }
    if let Some(out) = cli.out {
        config.snapshot_path = out;
    }
    if let Some(label) = cli.events_label {
        config.events_label = label;
    }

    let store = SnapshotStore::new(&config.snapshot_path);
    let snapshot = Aggregator::from_config(&config)
        .run(&store)
        .with_context(|| format!("Failed to write snapshot to {}", store.path().display()))?;

    for kind in SourceKind::ALL {
        info!(kind = %kind, records = snapshot.section(kind).records.len(), "Parsed");
    }
    println!("Wrote {}", store.path().display());
    Ok(())
}
