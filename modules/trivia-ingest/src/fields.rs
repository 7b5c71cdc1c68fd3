// Field recognizers shared by every source dialect.
//
// Each recognizer is a pure function from text to a field value or nothing.
// Dialect variance lives in ordered strategy lists, tried first to last.

use std::sync::LazyLock;

use regex::Regex;
use trivia_common::{SourceMeta, UNKNOWN};

use crate::segment::Block;

static NUMBERED_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\*\*)?\s*(\d+)\.(?:\*\*)?\s+(.+?)\s*(?:\*\*)?$").expect("valid regex")
});
static BOLD_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*([^*]+)\*\*$").expect("valid regex"));
static ORDINAL_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.").expect("valid regex"));
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").expect("valid regex"));
// `[label](url)` as the whole line, optionally bold and/or numbered.
static LINK_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\*\*)?(?:\d+\.\s*)?(?:\*\*)?\s*\[([^\]]+)\]\(([^)\s]+)\)\s*(?:\*\*)?$")
        .expect("valid regex")
});
// `Label:` at line start, in any of the bold placements the dialects use.
static LABEL_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\*\*)?[A-Za-z][A-Za-z0-9 '&/()\-]{0,40}(?:\*\*)?:(?:\*\*)?(?:\s|$)")
        .expect("valid regex")
});
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[*+\-•][ \t]+").expect("valid regex"));
static SOURCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Source:\s*(.*?)\s*(?:\((.*?)\))?\s*$").expect("valid regex")
});

// --- Title / rank ---

/// A record-opening line: `<ordinal>. <title>` or a bare bold title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleLine {
    pub rank: Option<u32>,
    pub title: String,
}

type TitleStrategy = fn(&str) -> Option<TitleLine>;

/// Tried in order; the first hit wins.
const TITLE_STRATEGIES: &[TitleStrategy] = &[numbered_title, bold_title];

/// Recognize a title line. Ordinals must be positive integers; anything
/// else is not a title and falls through to detail or terminator handling.
pub fn parse_title(line: &str) -> Option<TitleLine> {
    let line = line.trim();
    TITLE_STRATEGIES.iter().find_map(|strategy| strategy(line))
}

fn numbered_title(line: &str) -> Option<TitleLine> {
    let caps = NUMBERED_TITLE_RE.captures(line)?;
    let rank: u32 = caps[1].parse().ok().filter(|r| *r > 0)?;
    let title = clean_value(&caps[2]);
    if title.is_empty() {
        return None;
    }
    Some(TitleLine {
        rank: Some(rank),
        title,
    })
}

fn bold_title(line: &str) -> Option<TitleLine> {
    let caps = BOLD_TITLE_RE.captures(line)?;
    let title = caps[1].trim();
    // A bold line led by an ordinal was already judged by `numbered_title`.
    if title.is_empty() || title.ends_with(':') || ORDINAL_PREFIX_RE.is_match(title) {
        return None;
    }
    Some(TitleLine {
        rank: None,
        title: title.to_string(),
    })
}

// --- Links ---

/// A markdown `[label](url)` link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// First markdown link in `text`, if any.
pub fn parse_link(text: &str) -> Option<Link> {
    let caps = LINK_RE.captures(text)?;
    let label = clean_value(&caps[1]);
    if label.is_empty() {
        return None;
    }
    Some(Link {
        label,
        url: caps[2].to_string(),
    })
}

/// A line that is nothing but a link, e.g. `**1. [Title](url)**`.
pub fn parse_link_line(line: &str) -> Option<Link> {
    let caps = LINK_LINE_RE.captures(strip_bullet(line))?;
    let label = clean_value(&caps[1]);
    if label.is_empty() {
        return None;
    }
    Some(Link {
        label,
        url: caps[2].to_string(),
    })
}

// --- Labeled detail fields ---

/// The labels one dialect knows about. A detail line is a line that starts
/// with one of them (after an optional bullet and bold markers); its value
/// runs to end of line or to the next known label.
pub struct FieldSet {
    labels: &'static [&'static str],
    label_re: Regex,
}

impl FieldSet {
    pub fn new(labels: &'static [&'static str]) -> Self {
        let mut ordered: Vec<&str> = labels.to_vec();
        // Longest first so a label never shadows a longer one sharing its prefix.
        ordered.sort_by_key(|l| std::cmp::Reverse(l.len()));
        let alternation = ordered
            .iter()
            .map(|l| regex::escape(l))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"(?:\*\*)?\b({alternation})(?:\*\*)?:(?:\*\*)?");
        Self {
            labels,
            label_re: Regex::new(&pattern).expect("escaped labels form a valid regex"),
        }
    }

    /// Split a detail line into `(label, value)` pairs. Returns `None` when
    /// the line does not start with a known label. Labels with an empty value
    /// are left out.
    pub fn detail_fields(&self, line: &str) -> Option<Vec<(&'static str, String)>> {
        let body = strip_bullet(line);
        let found: Vec<_> = self.label_re.captures_iter(body).collect();
        let first = found.first()?.get(0)?;
        if first.start() != 0 {
            return None;
        }

        let mut fields = Vec::new();
        for (i, caps) in found.iter().enumerate() {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let end = found
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map(|m| m.start())
                .unwrap_or(body.len());
            let value = clean_value(&body[whole.end()..end]);
            if value.is_empty() {
                continue;
            }
            if let Some(label) = self.labels.iter().find(|l| **l == name.as_str()) {
                fields.push((*label, value));
            }
        }
        Some(fields)
    }

    pub fn is_detail_line(&self, line: &str) -> bool {
        self.detail_fields(line).is_some()
    }

    /// Value of `label` in `block`: the first detail line carrying it.
    pub fn extract(&self, block: &Block<'_>, label: &str) -> Option<String> {
        block
            .lines
            .iter()
            .filter_map(|line| self.detail_fields(line))
            .flatten()
            .find(|(l, _)| *l == label)
            .map(|(_, value)| value)
    }
}

/// Whether `line` opens with some `Label:`, known to a field set or not.
pub fn is_labeled_line(line: &str) -> bool {
    LABEL_PREFIX_RE.is_match(strip_bullet(line))
}

/// Remove a leading list bullet (`*`, `-`, `+`, `•` followed by whitespace).
pub fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    match BULLET_RE.find(line) {
        Some(m) => line[m.end()..].trim_start(),
        None => line,
    }
}

/// Split a comma-separated value, trimming each element and dropping empties.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(clean_value)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Trim whitespace and stray bold markers.
pub fn clean_value(raw: &str) -> String {
    raw.trim().trim_matches('*').trim().to_string()
}

// --- Source metadata ---

/// Build source metadata from banner lines. `label` overrides any label
/// found in a markdown header. Returns `None` when there is nothing at all.
pub fn source_meta(header_lines: &[&str], label: Option<&str>) -> Option<SourceMeta> {
    let source = header_lines.iter().find_map(|line| parse_source_line(line));
    let header_label = header_lines.iter().find_map(|line| {
        let text = line.trim().strip_prefix('#')?.trim_start_matches('#').trim();
        (!text.is_empty()).then(|| text.to_string())
    });
    let label = label.map(str::to_string).or(header_label);

    if source.is_none() && label.is_none() {
        return None;
    }
    let (name, url) = source.unwrap_or_else(|| (UNKNOWN.to_string(), UNKNOWN.to_string()));
    Some(SourceMeta {
        name,
        url,
        snapshot_label: label.unwrap_or_else(|| UNKNOWN.to_string()),
    })
}

fn parse_source_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    let rest = line.strip_prefix("Source:")?;
    if let Some(link) = parse_link(rest) {
        return Some((link.label, link.url));
    }
    let caps = SOURCE_RE.captures(line)?;
    let name = caps
        .get(1)
        .map(|m| clean_value(m.as_str()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string());
    let url = caps
        .get(2)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string());
    Some((name, url))
}
