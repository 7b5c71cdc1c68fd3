use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker written into any field the source document never supplied.
pub const UNKNOWN: &str = "N/A";

/// Default summary for records whose summary is missing or blank.
pub const NO_SUMMARY: &str = "No summary available.";

// --- Source kinds ---

/// The four hand-authored feeds that make up a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Events,
    Movies,
    Music,
    Sports,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Events,
        SourceKind::Movies,
        SourceKind::Music,
        SourceKind::Sports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Events => "events",
            SourceKind::Movies => "movies",
            SourceKind::Music => "music",
            SourceKind::Sports => "sports",
        }
    }

    /// File name of this kind's document inside the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            SourceKind::Events => "current_events.txt",
            SourceKind::Movies => "movie_data.txt",
            SourceKind::Music => "music_data.txt",
            SourceKind::Sports => "sports_news.txt",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance attached to a whole parser output, never to single records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMeta {
    pub name: String,
    pub url: String,
    pub snapshot_label: String,
}

// --- Records ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub headline: String,
    pub url: String,
    pub summary: String,
    pub date: String,
    pub source: String,
}

/// A box-office chart entry. `rank` is `None` when the title line carried
/// no ordinal; it serializes as the unknown marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(with = "rank_or_unknown")]
    pub rank: Option<u32>,
    pub title: String,
    pub weekend_gross: String,
    pub total_gross: String,
    pub weeks_released: String,
    pub summary: String,
    pub stars: Vec<String>,
}

impl MovieRecord {
    /// A freshly opened record: every detail field starts out unknown.
    pub fn new(rank: Option<u32>, title: impl Into<String>) -> Self {
        Self {
            rank,
            title: title.into(),
            weekend_gross: UNKNOWN.to_string(),
            total_gross: UNKNOWN.to_string(),
            weeks_released: UNKNOWN.to_string(),
            summary: NO_SUMMARY.to_string(),
            stars: vec![UNKNOWN.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicRecord {
    pub rank: u32,
    pub title: String,
    pub artist: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SportsRecord {
    pub category: String,
    pub headline: String,
    pub date: String,
}

/// One fact per line, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleTextRecord {
    pub raw_line: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Event(EventRecord),
    Movie(MovieRecord),
    Music(MusicRecord),
    Sports(SportsRecord),
    SimpleText(SimpleTextRecord),
}

impl From<EventRecord> for Record {
    fn from(r: EventRecord) -> Self {
        Record::Event(r)
    }
}

impl From<MovieRecord> for Record {
    fn from(r: MovieRecord) -> Self {
        Record::Movie(r)
    }
}

impl From<MusicRecord> for Record {
    fn from(r: MusicRecord) -> Self {
        Record::Music(r)
    }
}

impl From<SportsRecord> for Record {
    fn from(r: SportsRecord) -> Self {
        Record::Sports(r)
    }
}

impl From<SimpleTextRecord> for Record {
    fn from(r: SimpleTextRecord) -> Self {
        Record::SimpleText(r)
    }
}

mod rank_or_unknown {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::UNKNOWN;

    pub fn serialize<S: Serializer>(rank: &Option<u32>, s: S) -> Result<S::Ok, S::Error> {
        match rank {
            Some(r) => s.serialize_u32(*r),
            None => s.serialize_str(UNKNOWN),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Rank(u32),
            Text(serde::de::IgnoredAny),
        }

        Ok(match Repr::deserialize(d)? {
            Repr::Rank(r) => Some(r),
            Repr::Text(_) => None,
        })
    }
}

// --- Snapshot ---

/// One kind's parser output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindSection {
    pub records: Vec<Record>,
    pub source: Option<SourceMeta>,
}

impl KindSection {
    pub fn new(records: Vec<Record>, source: Option<SourceMeta>) -> Self {
        Self { records, source }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The full normalized record set, keyed by kind. Each aggregation run
/// builds a new one; it is never merged into a previous snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub events: KindSection,
    #[serde(default)]
    pub movies: KindSection,
    #[serde(default)]
    pub music: KindSection,
    #[serde(default)]
    pub sports: KindSection,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            generated_at: Utc::now(),
            events: KindSection::default(),
            movies: KindSection::default(),
            music: KindSection::default(),
            sports: KindSection::default(),
        }
    }

    pub fn section(&self, kind: SourceKind) -> &KindSection {
        match kind {
            SourceKind::Events => &self.events,
            SourceKind::Movies => &self.movies,
            SourceKind::Music => &self.music,
            SourceKind::Sports => &self.sports,
        }
    }

    pub fn section_mut(&mut self, kind: SourceKind) -> &mut KindSection {
        match kind {
            SourceKind::Events => &mut self.events,
            SourceKind::Movies => &mut self.movies,
            SourceKind::Music => &mut self.music,
            SourceKind::Sports => &mut self.sports,
        }
    }

    pub fn total_records(&self) -> usize {
        SourceKind::ALL
            .iter()
            .map(|k| self.section(*k).records.len())
            .sum()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

// --- Quiz ---

/// A question record as the upstream pool source delivers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuestion {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    pub category: String,
    pub difficulty: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A question ready to be served. `id` is unique within its batch only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub difficulty: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
}
