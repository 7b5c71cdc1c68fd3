use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use trivia_common::{KindSection, Record, SimpleTextRecord, SourceKind, SportsRecord, UNKNOWN};

use super::{FormatParser, LineMode};
use crate::document::RawDocument;
use crate::fields::{clean_value, source_meta, strip_bullet};
use crate::segment::{segment, SegmentStyle};

// `**NFL:**`
static CATEGORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*(.+?):\*\*$").expect("valid regex"));
// Trailing `(May 3)` on a headline.
static TRAILING_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(([^()]*)\)\s*$").expect("valid regex"));

/// Sports headlines parser.
///
/// The structured dialect groups bullet headlines under bold category
/// headers; a trailing parenthetical on a headline is its date. Documents
/// without category headers are read as one simple record per line.
#[derive(Debug, Default)]
pub struct SportsParser {
    mode: LineMode,
}

impl SportsParser {
    pub fn new(mode: LineMode) -> Self {
        Self { mode }
    }
}

impl FormatParser for SportsParser {
    fn kind(&self) -> SourceKind {
        SourceKind::Sports
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
            LineMode::Auto => lines.iter().any(|l| category_header(l).is_some()),
        };

        let records = if structured {
            categorized(&lines)
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

fn categorized(lines: &[&str]) -> Vec<Record> {
    let mut records = Vec::new();
    let mut category: Option<String> = None;

    for line in lines {
        if let Some(name) = category_header(line) {
            category = Some(name);
            continue;
        }
        match (&category, headline_bullet(line)) {
            (Some(cat), Some(item)) if !item.is_empty() => {
                records.push(Record::from(headline_with_date(cat, item)));
            }
            _ => debug!(line = *line, "Skipping sports line outside a category bullet"),
        }
    }

    records
}

/// Bullet text of a headline line. The marker need not be followed by a
/// space (`*Celtics win`), but a bold run (`**...`) is not a bullet.
fn headline_bullet(line: &str) -> Option<&str> {
    let stripped = strip_bullet(line);
    if stripped.len() != line.len() {
        return Some(stripped);
    }
    if line.starts_with("**") {
        return None;
    }
    let rest = line.strip_prefix(['*', '-', '+', '•'])?;
    Some(rest.trim())
}

fn category_header(line: &str) -> Option<String> {
    let caps = CATEGORY_RE.captures(line)?;
    let name = clean_value(&caps[1]);
    (!name.is_empty()).then_some(name)
}

fn headline_with_date(category: &str, item: &str) -> SportsRecord {
    let (headline, date) = match TRAILING_DATE_RE.captures(item) {
        Some(caps) => {
            let date = caps[1].trim().to_string();
            let start = caps.get(0).map_or(item.len(), |m| m.start());
            (item[..start].trim().to_string(), date)
        }
        None => (item.trim().to_string(), UNKNOWN.to_string()),
    };
    let date = if date.is_empty() { UNKNOWN.to_string() } else { date };

    SportsRecord {
        category: category.to_string(),
        headline,
        date,
    }
}
