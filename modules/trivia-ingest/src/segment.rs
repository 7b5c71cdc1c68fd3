use std::sync::LazyLock;

use regex::Regex;

use crate::fields::parse_title;

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:-{3,}|\*{3,}|_{3,}|={3,})\s*$").expect("valid regex"));

/// How a document is cut into candidate record blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStyle {
    /// A block opens at every title line (`**1. Title**` and friends).
    NumberedBoldHeader,
    /// Blocks are separated by one or more empty lines.
    BlankLineDelimited,
    /// Blocks are separated by horizontal-rule lines (`---`, `***`, `___`).
    Separator,
    /// The whole document is one block; used for line-per-item feeds.
    None,
}

/// A contiguous span of lines believed to describe one record.
/// Never empty, never starts or ends with a blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    pub lines: Vec<&'a str>,
}

impl<'a> Block<'a> {
    pub fn first_line(&self) -> &'a str {
        self.lines.first().copied().unwrap_or("")
    }

    /// Lines that carry text.
    pub fn content_lines(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines.iter().copied().filter(|l| !l.trim().is_empty())
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Output of `segment`: the banner lines that were pulled out for metadata,
/// and the record blocks in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmented<'a> {
    pub header_lines: Vec<&'a str>,
    pub blocks: Vec<Block<'a>>,
}

/// Markdown headers and `Source:` banners never belong to a record.
pub fn is_header_line(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with('#') || line.starts_with("Source:")
}

pub fn is_separator_line(line: &str) -> bool {
    SEPARATOR_RE.is_match(line)
}

/// Split `document` into blocks according to `style`.
pub fn segment(document: &str, style: SegmentStyle) -> Segmented<'_> {
    let mut out = Segmented::default();
    let mut current: Vec<&str> = Vec::new();

    for line in document.lines() {
        let line = line.trim_end_matches('\r');
        if is_header_line(line) {
            out.header_lines.push(line);
            continue;
        }

        match style {
            SegmentStyle::NumberedBoldHeader => {
                if parse_title(line).is_some() {
                    close_block(&mut out.blocks, &mut current);
                }
                current.push(line);
            }
            SegmentStyle::BlankLineDelimited => {
                if line.trim().is_empty() {
                    close_block(&mut out.blocks, &mut current);
                } else {
                    current.push(line);
                }
            }
            SegmentStyle::Separator => {
                if is_separator_line(line) {
                    close_block(&mut out.blocks, &mut current);
                } else {
                    current.push(line);
                }
            }
            SegmentStyle::None => current.push(line),
        }
    }
    close_block(&mut out.blocks, &mut current);

    out
}

/// Emit the pending lines as a block, trimmed of blank edges. A block with
/// nothing left after trimming is dropped.
fn close_block<'a>(blocks: &mut Vec<Block<'a>>, current: &mut Vec<&'a str>) {
    let lines = std::mem::take(current);
    let Some(start) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return;
    };
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .unwrap_or(start);
    blocks.push(Block {
        lines: lines[start..=end].to_vec(),
    });
}
