/// Result type alias for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Source unavailable ({source_id}): {reason}")]
    SourceUnavailable { source_id: String, reason: String },

    #[error("Malformed block in {source_id}: {reason}")]
    MalformedBlock { source_id: String, reason: String },

    #[error("Snapshot write failed: {0}")]
    Persist(#[from] std::io::Error),

    #[error("Snapshot encoding error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl IngestError {
    pub(crate) fn malformed(source_id: &str, reason: impl Into<String>) -> Self {
        IngestError::MalformedBlock {
            source_id: source_id.to_string(),
            reason: reason.into(),
        }
    }
}
