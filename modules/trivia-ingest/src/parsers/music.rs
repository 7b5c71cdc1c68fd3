use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use trivia_common::{KindSection, MusicRecord, Record, SimpleTextRecord, SourceKind};

use super::{FormatParser, LineMode};
use crate::document::RawDocument;
use crate::fields::{clean_value, source_meta};
use crate::segment::{segment, SegmentStyle};

// `1. Song Title - Artist Name`, ordinal optionally bold.
static RANKED_SONG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\*\*)?(\d+)\.(?:\*\*)?\s+(.+?)\s+[-–—]\s+(.+?)$").expect("valid regex")
});

/// Music chart parser: ranked `title - artist` lines, or one simple text
/// record per line when the chart has no ranked lines at all.
#[derive(Debug, Default)]
pub struct MusicParser {
    mode: LineMode,
}

impl MusicParser {
    pub fn new(mode: LineMode) -> Self {
        Self { mode }
    }
}

impl FormatParser for MusicParser {
    fn kind(&self) -> SourceKind {
        SourceKind::Music
    }

    fn parse(&self, doc: &RawDocument) -> KindSection {
        let segmented = segment(&doc.text, SegmentStyle::None);
        let lines: Vec<&str> = segmented
            .blocks
            .iter()
            .flat_map(|b| b.content_lines())
            .map(str::trim)
            .collect();

        let structured = match self.mode {
            LineMode::Simple => false,
            LineMode::Structured => true,
            LineMode::Auto => lines.iter().any(|l| parse_ranked_song(l).is_some()),
        };

        let records: Vec<Record> = if structured {
            lines
                .iter()
                .filter_map(|line| {
                    let song = parse_ranked_song(line);
                    if song.is_none() {
                        debug!(line = *line, "Skipping unranked music line");
                    }
                    song
                })
                .map(Record::from)
                .collect()
        } else {
            lines
                .iter()
                .map(|line| {
                    Record::from(SimpleTextRecord {
                        raw_line: line.to_string(),
                    })
                })
                .collect()
        };

        KindSection::new(records, source_meta(&segmented.header_lines, None))
    }
}

fn parse_ranked_song(line: &str) -> Option<MusicRecord> {
    let caps = RANKED_SONG_RE.captures(line)?;
    let rank: u32 = caps[1].parse().ok().filter(|r| *r > 0)?;
    let title = clean_value(&caps[2]);
    let artist = clean_value(&caps[3]);
    if title.is_empty() || artist.is_empty() {
        return None;
    }
    Some(MusicRecord {
        rank,
        title,
        artist,
    })
}
