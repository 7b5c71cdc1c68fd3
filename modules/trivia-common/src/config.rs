use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::types::SourceKind;

/// Application configuration loaded from environment variables.
/// Everything has a default so a bare checkout runs against `./static`.
#[derive(Debug, Clone)]
pub struct Config {
    // Ingest
    pub data_dir: PathBuf,
    pub snapshot_path: PathBuf,
    pub events_label: String,

    // Quiz pool source
    pub opentdb_base_url: String,
    pub quiz_category: u32,
    pub quiz_batch_size: u32,
    pub fetch_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.log_summary();
        Ok(config)
    }

    /// Build a config from an arbitrary key lookup. `from_env` is this over
    /// the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = PathBuf::from(lookup("TRIVIA_DATA_DIR").unwrap_or_else(|| "static".into()));
        let snapshot_path = lookup("TRIVIA_SNAPSHOT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("trivia_data.json"));

        Ok(Self {
            snapshot_path,
            events_label: lookup("TRIVIA_EVENTS_LABEL").unwrap_or_else(|| "Unknown Date".into()),
            opentdb_base_url: lookup("OPENTDB_BASE_URL")
                .unwrap_or_else(|| "https://opentdb.com".into()),
            quiz_category: parse_or(&lookup, "QUIZ_CATEGORY", 22)?,
            quiz_batch_size: parse_or(&lookup, "QUIZ_BATCH_SIZE", 10)?,
            fetch_timeout: Duration::from_secs(parse_or(&lookup, "QUIZ_FETCH_TIMEOUT_SECS", 20)?),
            data_dir,
        })
    }

    /// Path of the document for `kind` inside the data directory.
    pub fn source_path(&self, kind: SourceKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    fn log_summary(&self) {
        info!(
            data_dir = %self.data_dir.display(),
            snapshot = %self.snapshot_path.display(),
            opentdb = self.opentdb_base_url.as_str(),
            category = self.quiz_category,
            batch_size = self.quiz_batch_size,
            timeout_secs = self.fetch_timeout.as_secs(),
            "Configuration loaded"
        );
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number, got {raw:?}")),
        None => Ok(default),
    }
}
