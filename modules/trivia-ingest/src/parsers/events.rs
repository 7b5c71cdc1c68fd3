use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;
use trivia_common::{EventRecord, KindSection, Record, SourceKind, NO_SUMMARY, UNKNOWN};

use super::FormatParser;
use crate::document::RawDocument;
use crate::error::{IngestError, Result};
use crate::fields::{clean_value, parse_link, parse_link_line, source_meta, FieldSet, Link};
use crate::segment::{is_separator_line, segment, Block, SegmentStyle};

const HEADLINE: &str = "Headline";
const SUMMARY: &str = "Summary";
const DATE: &str = "Date";
const SOURCE: &str = "Source";

const EVENT_LABELS: &[&str] = &[HEADLINE, SUMMARY, DATE, SOURCE];

static EVENT_FIELDS: LazyLock<FieldSet> = LazyLock::new(|| FieldSet::new(EVENT_LABELS));

// `**1.** **May 3:** Something happened (Reuters)`
static LEGACY_BOLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\*(\d+)\.\*\*\s*(?:\*\*(.*?):\*\*\s*)?(.*?)\s*\((.*?)\)").expect("valid regex")
});
// `1. **May 3:** Something happened (Reuters)`
static LEGACY_PLAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\s+(?:\*\*(.*?):\*\*\s*)?(.*?)\s*\((.*?)\)").expect("valid regex")
});

type HeadlineStrategy = fn(&Block<'_>) -> Option<Link>;

/// Tried in order; the first link found becomes headline and URL.
const HEADLINE_STRATEGIES: &[HeadlineStrategy] = &[labeled_headline, leading_link];

type LegacyStrategy = fn(&str) -> Option<EventRecord>;

const LEGACY_STRATEGIES: &[LegacyStrategy] = &[legacy_bold, legacy_plain];

/// Current-events parser.
///
/// Blocks are cut at separator lines (or blank lines when the document has
/// no separators) and each must carry a linked headline. Documents in the
/// older numbered one-line dialect are read when no block qualifies.
#[derive(Debug, Default)]
pub struct EventsParser {
    label: Option<String>,
}

impl EventsParser {
    /// `label` is the snapshot label attached to the output; it is supplied
    /// by the caller, not read from the document.
    pub fn new(label: Option<String>) -> Self {
        Self { label }
    }
}

impl FormatParser for EventsParser {
    fn kind(&self) -> SourceKind {
        SourceKind::Events
    }

    fn parse(&self, doc: &RawDocument) -> KindSection {
        let style = if doc.text.lines().any(is_separator_line) {
            SegmentStyle::Separator
        } else {
            SegmentStyle::BlankLineDelimited
        };
        let segmented = segment(&doc.text, style);

        let mut events = Vec::new();
        for block in &segmented.blocks {
            match parse_event_block(&doc.source_id, block) {
                Ok(event) => events.push(event),
                Err(e) => debug!(error = %e, "Skipping event block"),
            }
        }

        if events.is_empty() {
            events = parse_legacy(&doc.text);
            if !events.is_empty() {
                debug!(source = doc.source_id.as_str(), count = events.len(), "Read legacy numbered events");
            }
        }

        KindSection::new(
            events.into_iter().map(Record::from).collect(),
            source_meta(&segmented.header_lines, self.label.as_deref()),
        )
    }
}

fn parse_event_block(source_id: &str, block: &Block<'_>) -> Result<EventRecord> {
    let link = HEADLINE_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(block))
        .ok_or_else(|| IngestError::malformed(source_id, "no linked headline"))?;

    let summary = EVENT_FIELDS
        .extract(block, SUMMARY)
        .unwrap_or_else(|| NO_SUMMARY.to_string());

    Ok(EventRecord {
        headline: link.label,
        url: link.url,
        summary,
        date: field_or_unknown(block, DATE),
        source: field_or_unknown(block, SOURCE),
    })
}

fn field_or_unknown(block: &Block<'_>, label: &str) -> String {
    EVENT_FIELDS
        .extract(block, label)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn labeled_headline(block: &Block<'_>) -> Option<Link> {
    EVENT_FIELDS
        .extract(block, HEADLINE)
        .and_then(|value| parse_link(&value))
}

/// The first non-detail line, when that line is a link and nothing else.
/// A link inside prose is not a headline.
fn leading_link(block: &Block<'_>) -> Option<Link> {
    block
        .content_lines()
        .find(|line| !EVENT_FIELDS.is_detail_line(line))
        .and_then(parse_link_line)
}

// --- Legacy numbered dialect ---

fn parse_legacy(text: &str) -> Vec<EventRecord> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| LEGACY_STRATEGIES.iter().find_map(|strategy| strategy(line)))
        .collect()
}

fn legacy_bold(line: &str) -> Option<EventRecord> {
    let caps = LEGACY_BOLD_RE.captures(line)?;
    legacy_event(&caps, 2, 3, 4)
}

fn legacy_plain(line: &str) -> Option<EventRecord> {
    let caps = LEGACY_PLAIN_RE.captures(line)?;
    legacy_event(&caps, 1, 2, 3)
}

fn legacy_event(caps: &Captures<'_>, date: usize, desc: usize, source: usize) -> Option<EventRecord> {
    let headline = clean_value(caps.get(desc)?.as_str());
    if headline.is_empty() {
        return None;
    }
    let date = caps
        .get(date)
        .map(|m| clean_value(m.as_str()))
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string());
    let source = caps
        .get(source)
        .map(|m| clean_value(m.as_str()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string());

    Some(EventRecord {
        headline,
        url: UNKNOWN.to_string(),
        summary: NO_SUMMARY.to_string(),
        date,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(text: &str) -> Vec<EventRecord> {
        EventsParser::new(Some("June 1, 2025".into()))
            .parse(&RawDocument::new("events", text))
            .records
            .into_iter()
            .map(|r| match r {
                Record::Event(e) => e,
                other => panic!("expected event, got {other:?}"),
            })
            .collect()
    }

    #[test]
    fn separator_blocks_with_labeled_headlines() {
        let parsed = events(
            "# Current Events\n\
             ---\n\
             **Headline:** [Storm hits coast](https://news.example/storm)\n\
             **Summary:** Thousands without power.\n\
             **Date:** June 1, 2025\n\
             ---\n\
             **Headline:** [Election results](https://news.example/vote)\n\
             ---\n",
        );
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].headline, "Storm hits coast");
        assert_eq!(parsed[0].url, "https://news.example/storm");
        assert_eq!(parsed[0].summary, "Thousands without power.");
        assert_eq!(parsed[0].date, "June 1, 2025");
        assert_eq!(parsed[1].summary, NO_SUMMARY);
        assert_eq!(parsed[1].date, UNKNOWN);
    }

    #[test]
    fn blank_line_blocks_with_leading_links() {
        let parsed = events(
            "**1. [Rates held steady](https://news.example/rates)**\n\
             *   **Summary:** The central bank paused.\n\
             \n\
             **2. [Rover lands](https://news.example/rover)**\n",
        );
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].headline, "Rates held steady");
        assert_eq!(parsed[0].summary, "The central bank paused.");
        assert_eq!(parsed[1].url, "https://news.example/rover");
    }

    #[test]
    fn block_without_link_is_skipped() {
        let parsed = events(
            "Just an intro paragraph.\n\n**Headline:** [Kept](https://news.example/kept)\n",
        );
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].headline, "Kept");
    }

    #[test]
    fn linked_intro_prose_is_not_an_event() {
        let parsed = events(
            "Today's roundup, powered by [NewsCo](https://newsco.example).\n\n\
             **Headline:** [Storm](https://news.example/storm)\n",
        );
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].headline, "Storm");
        assert_eq!(parsed[0].url, "https://news.example/storm");
    }

    #[test]
    fn supplied_label_is_attached() {
        let section = EventsParser::new(Some("June 1, 2025".into())).parse(&RawDocument::new(
            "events",
            "# Headlines of the Day\n[A](https://a.example)\n",
        ));
        assert_eq!(section.source.unwrap().snapshot_label, "June 1, 2025");
    }

    #[test]
    fn legacy_numbered_dialect() {
        let parsed = events(
            "**1.** **May 3:** Parliament passes budget (Reuters)\n\
             2. Heatwave breaks records (AP)\n",
        );
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].headline, "Parliament passes budget");
        assert_eq!(parsed[0].date, "May 3");
        assert_eq!(parsed[0].source, "Reuters");
        assert_eq!(parsed[0].url, UNKNOWN);
        assert_eq!(parsed[1].headline, "Heatwave breaks records");
        assert_eq!(parsed[1].date, UNKNOWN);
        assert_eq!(parsed[1].source, "AP");
    }

    #[test]
    fn no_events_in_plain_prose() {
        assert!(events("Nothing to see here.\n").is_empty());
    }
}
