use std::path::Path;

use crate::error::{IngestError, Result};

/// A source document as read from disk. Parsed once per aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub source_id: String,
    pub text: String,
}

impl RawDocument {
    pub fn new(source_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            text: text.into(),
        }
    }

    /// Read a UTF-8 document. Missing or unreadable files surface as
    /// `SourceUnavailable`.
    pub fn read(path: &Path) -> Result<Self> {
        let source_id = path.display().to_string();
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Self { source_id, text }),
            Err(e) => Err(IngestError::SourceUnavailable {
                source_id,
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = RawDocument::read(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, IngestError::SourceUnavailable { .. }));
    }

    #[test]
    fn invalid_utf8_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("music_data.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = RawDocument::read(&path).unwrap_err();
        assert!(matches!(
            err,
            IngestError::SourceUnavailable { ref source_id, .. } if source_id.ends_with("music_data.txt")
        ));
    }

    #[test]
    fn reads_text_and_records_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("music_data.txt");
        std::fs::write(&path, "1. Song - Artist\n").unwrap();

        let doc = RawDocument::read(&path).unwrap();
        assert_eq!(doc.text, "1. Song - Artist\n");
        assert!(doc.source_id.ends_with("music_data.txt"));
    }
}
