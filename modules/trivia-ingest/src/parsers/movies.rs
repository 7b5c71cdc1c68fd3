use std::sync::LazyLock;

use tracing::debug;
use trivia_common::{KindSection, MovieRecord, Record, SourceKind, NO_SUMMARY};

use super::FormatParser;
use crate::document::RawDocument;
use crate::error::{IngestError, Result};
use crate::fields::{is_labeled_line, parse_title, source_meta, split_list, FieldSet};
use crate::segment::{segment, Block, SegmentStyle};

const WEEKEND_GROSS: &str = "Weekend Gross";
const TOTAL_GROSS: &str = "Total Gross";
const WEEKS_RELEASED: &str = "Weeks Released";
const SUMMARY: &str = "Summary";
const STARS: &str = "Stars";

const MOVIE_LABELS: &[&str] = &[WEEKEND_GROSS, TOTAL_GROSS, WEEKS_RELEASED, SUMMARY, STARS];

static MOVIE_FIELDS: LazyLock<FieldSet> = LazyLock::new(|| FieldSet::new(MOVIE_LABELS));

/// Box-office chart parser.
///
/// A title line opens a record; the detail lines that follow fill it in.
/// Detail lines with labels this parser does not know are ignored. The
/// first unlabeled, non-blank line closes the record, and anything after it
/// up to the next title is dropped rather than merged.
#[derive(Debug, Default)]
pub struct MoviesParser;

impl MoviesParser {
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for MoviesParser {
    fn kind(&self) -> SourceKind {
        SourceKind::Movies
    }

    fn parse(&self, doc: &RawDocument) -> KindSection {
        let segmented = segment(&doc.text, SegmentStyle::NumberedBoldHeader);

        let mut movies: Vec<MovieRecord> = Vec::new();
        for block in &segmented.blocks {
            match parse_movie_block(&doc.source_id, block) {
                Ok(movie) => movies.push(movie),
                Err(e) => debug!(error = %e, "Skipping movie block"),
            }
        }

        // Stable: unranked records keep their source order after the ranked ones.
        movies.sort_by_key(|m| (m.rank.is_none(), m.rank));

        KindSection::new(
            movies.into_iter().map(Record::from).collect(),
            source_meta(&segmented.header_lines, None),
        )
    }
}

fn parse_movie_block(source_id: &str, block: &Block<'_>) -> Result<MovieRecord> {
    let title = parse_title(block.first_line()).ok_or_else(|| {
        IngestError::malformed(source_id, format!("no title line: {:?}", block.first_line()))
    })?;
    let mut movie = MovieRecord::new(title.rank, title.title);

    for line in block.lines.iter().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let Some(fields) = MOVIE_FIELDS.detail_fields(line) else {
            if is_labeled_line(line) {
                debug!(title = movie.title.as_str(), line = *line, "Ignoring unknown movie detail");
                continue;
            }
            debug!(title = movie.title.as_str(), line = *line, "Stray line closes movie record");
            break;
        };
        for (label, value) in fields {
            apply_detail(&mut movie, label, value);
        }
    }

    Ok(movie)
}

fn apply_detail(movie: &mut MovieRecord, label: &str, value: String) {
    match label {
        WEEKEND_GROSS => movie.weekend_gross = value,
        TOTAL_GROSS => movie.total_gross = value,
        WEEKS_RELEASED => movie.weeks_released = value,
        SUMMARY => {
            let summary = value.trim();
            movie.summary = if summary.is_empty() {
                NO_SUMMARY.to_string()
            } else {
                summary.to_string()
            };
        }
        STARS => {
            let stars = split_list(&value);
            if !stars.is_empty() {
                movie.stars = stars;
            }
        }
        _ => {}
    }
}
