// One parser per source kind. Each composes the segmenter with its own
// field set and kind-specific policy, and never fails: structural problems
// become skipped blocks or an empty section.

mod events;
mod movies;
mod music;
mod sports;

pub use events::EventsParser;
pub use movies::MoviesParser;
pub use music::MusicParser;
pub use sports::SportsParser;

use trivia_common::{KindSection, SourceKind};

use crate::document::RawDocument;

pub trait FormatParser: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Parse one document. Same input, same output.
    fn parse(&self, doc: &RawDocument) -> KindSection;
}

/// How the line-per-item feeds (music, sports) are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineMode {
    /// Structured when the document shows the structured dialect anywhere,
    /// simple lines otherwise.
    #[default]
    Auto,
    /// Every non-empty, non-header line becomes a simple text record.
    Simple,
    /// Only the structured dialect is recognized; other lines are skipped.
    Structured,
}

/// The default parser for each kind.
pub fn default_parsers(events_label: Option<String>) -> Vec<Box<dyn FormatParser>> {
    vec![
        Box::new(EventsParser::new(events_label)),
        Box::new(MoviesParser::new()),
        Box::new(MusicParser::new(LineMode::Auto)),
        Box::new(SportsParser::new(LineMode::Auto)),
    ]
}
