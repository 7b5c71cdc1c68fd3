use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use trivia_common::{Config, KindSection, Snapshot, SourceKind};

use crate::document::RawDocument;
use crate::error::Result;
use crate::parsers::{default_parsers, FormatParser};
use crate::store::SnapshotStore;

/// Where each kind's document lives. Kinds without a path yield an empty
/// section.
#[derive(Debug, Clone, Default)]
pub struct SourcePaths {
    paths: BTreeMap<SourceKind, PathBuf>,
}

impl SourcePaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// The conventional file name for every kind inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        let mut paths = Self::new();
        for kind in SourceKind::ALL {
            paths = paths.with(kind, dir.join(kind.file_name()));
        }
        paths
    }

    pub fn with(mut self, kind: SourceKind, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(kind, path.into());
        self
    }

    pub fn get(&self, kind: SourceKind) -> Option<&Path> {
        self.paths.get(&kind).map(PathBuf::as_path)
    }
}

/// Runs every format parser over its own document and merges the results
/// into one snapshot. One bad source never blocks the others.
pub struct Aggregator {
    sources: SourcePaths,
    parsers: Vec<Box<dyn FormatParser>>,
}

impl Aggregator {
    pub fn new(sources: SourcePaths, events_label: Option<String>) -> Self {
        Self {
            sources,
            parsers: default_parsers(events_label),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            SourcePaths::in_dir(&config.data_dir),
            Some(config.events_label.clone()),
        )
    }

    /// Replace the parser for `parser.kind()`.
    pub fn with_parser(mut self, parser: Box<dyn FormatParser>) -> Self {
        self.parsers.retain(|p| p.kind() != parser.kind());
        self.parsers.push(parser);
        self
    }

    /// Parse every source into a fresh snapshot. Never fails: a missing,
    /// unreadable or unrecognizable document leaves its kind empty.
    pub fn aggregate(&self) -> Snapshot {
        let mut snapshot = Snapshot::empty();
        for parser in &self.parsers {
            let kind = parser.kind();
            *snapshot.section_mut(kind) = self.parse_kind(parser.as_ref());
        }

        info!(
            events = snapshot.events.records.len(),
            movies = snapshot.movies.records.len(),
            music = snapshot.music.records.len(),
            sports = snapshot.sports.records.len(),
            "Aggregation complete"
        );
        snapshot
    }

    /// Aggregate and persist, replacing whatever the store held.
    pub fn run(&self, store: &SnapshotStore) -> Result<Snapshot> {
        let snapshot = self.aggregate();
        store.store(&snapshot)?;
        Ok(snapshot)
    }

    fn parse_kind(&self, parser: &dyn FormatParser) -> KindSection {
        let kind = parser.kind();
        let Some(path) = self.sources.get(kind) else {
            warn!(kind = %kind, "No source document configured");
            return KindSection::default();
        };

        let doc = match RawDocument::read(path) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(kind = %kind, error = %e, "Source unavailable, leaving kind empty");
                return KindSection::default();
            }
        };

        let section = parser.parse(&doc);
        if section.is_empty() {
            warn!(kind = %kind, source = doc.source_id.as_str(), "No records recognized");
        }
        section
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedParser(SourceKind, usize);

    impl FormatParser for FixedParser {
        fn kind(&self) -> SourceKind {
            self.0
        }

        fn parse(&self, _doc: &RawDocument) -> KindSection {
            let records = (0..self.1)
                .map(|i| {
                    trivia_common::SimpleTextRecord {
                        raw_line: format!("line {i}"),
                    }
                    .into()
                })
                .collect();
            KindSection::new(records, None)
        }
    }

    #[test]
    fn unconfigured_kinds_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("music.txt"), "anything").unwrap();

        let aggregator = Aggregator::new(
            SourcePaths::new().with(SourceKind::Music, dir.path().join("music.txt")),
            None,
        )
        .with_parser(Box::new(FixedParser(SourceKind::Music, 2)));

        let snapshot = aggregator.aggregate();
        assert_eq!(snapshot.music.records.len(), 2);
        assert!(snapshot.events.is_empty());
        assert!(snapshot.movies.is_empty());
        assert!(snapshot.sports.is_empty());
    }

    #[test]
    fn with_parser_replaces_by_kind() {
        let aggregator = Aggregator::new(SourcePaths::new(), None)
            .with_parser(Box::new(FixedParser(SourceKind::Sports, 1)));
        assert_eq!(aggregator.parsers.len(), SourceKind::ALL.len());
    }

    #[test]
    fn in_dir_uses_conventional_names() {
        let paths = SourcePaths::in_dir(Path::new("/data"));
        assert_eq!(
            paths.get(SourceKind::Events),
            Some(Path::new("/data/current_events.txt"))
        );
        assert_eq!(
            paths.get(SourceKind::Sports),
            Some(Path::new("/data/sports_news.txt"))
        );
    }
}
