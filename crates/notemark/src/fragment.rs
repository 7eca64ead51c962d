//! Run merging and fragment splitting.
//!
//! Runs with identical formatting are coalesced, then each merged span is cut
//! on whitespace that touches a line break or either end of the span, since
//! Markdown cannot carry inline styling across those boundaries.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Formatting, Note, OffsetUnit, StyleType};

static FRAGMENT_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\n ]+|(?:[\n ]+)?\n(?:[\n ]+)?|[\n ]+$").unwrap());

/// A piece of note text and the formatting it carries. Each fragment owns
/// its formatting; siblings split from the same run never alias.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub format: Formatting,
    pub text: String,
    pub kind: FragmentKind,
}

impl Fragment {
    pub fn new(format: Formatting, text: impl Into<String>) -> Self {
        let text = text.into();
        let kind = FragmentKind::classify(&text);
        Self { format, text, kind }
    }

    /// Whether a fragment following this one starts a new line.
    pub fn opens_line_for(&self, next: &Formatting) -> bool {
        if self.kind == FragmentKind::Newlines {
            return true;
        }
        if ends_with_space_then_newlines(&self.text) {
            return true;
        }
        let bulleted = matches!(
            next.style_type(),
            StyleType::DashedList | StyleType::DottedList | StyleType::Checkbox
        );
        bulleted && (self.text.ends_with("\n ") || self.text.ends_with('\t'))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// Only `' '`.
    Spaces,
    /// Only `'\n'`.
    Newlines,
    /// Whitespace of any other mix.
    Whitespace,
    /// Has at least one non-whitespace character.
    Content,
}

impl FragmentKind {
    pub fn classify(text: &str) -> Self {
        if !text.is_empty() && text.bytes().all(|b| b == b' ') {
            Self::Spaces
        } else if !text.is_empty() && text.bytes().all(|b| b == b'\n') {
            Self::Newlines
        } else if text.chars().all(char::is_whitespace) {
            Self::Whitespace
        } else {
            Self::Content
        }
    }
}

fn ends_with_space_then_newlines(text: &str) -> bool {
    let trimmed = text.trim_end_matches('\n');
    trimmed.len() < text.len() && trimmed.ends_with(' ')
}

/// Merge the note's runs and split them into fragments, in document order.
pub fn parse_tokens(note: &Note) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut cursor = OffsetCursor::new(&note.text, note.offset_unit);
    let runs = &note.attribute_runs;

    let mut i = 0;
    while i < runs.len() {
        let format = &runs[i].format;
        let start = cursor.byte_offset();
        let mut units = 0;
        while i < runs.len() && runs[i].format == *format {
            units += runs[i].length;
            i += 1;
        }
        let end = cursor.advance(units);
        split_span(&note.text[start..end], format, &mut fragments);
    }

    if cursor.byte_offset() < note.text.len() {
        tracing::warn!(
            "attribute runs cover {} of {} bytes; trailing text dropped",
            cursor.byte_offset(),
            note.text.len()
        );
    }

    fragments
}

fn split_span(text: &str, format: &Formatting, out: &mut Vec<Fragment>) {
    let mut last = 0;
    for m in FRAGMENT_SPLIT.find_iter(text) {
        if m.start() > last {
            out.push(Fragment::new(format.clone(), &text[last..m.start()]));
        }
        out.push(Fragment::new(format.clone(), m.as_str()));
        last = m.end();
    }
    if last < text.len() {
        out.push(Fragment::new(format.clone(), &text[last..]));
    }
}

/// Walks the note text in the unit the runs were measured in.
struct OffsetCursor<'a> {
    text: &'a str,
    unit: OffsetUnit,
    byte: usize,
}

impl<'a> OffsetCursor<'a> {
    fn new(text: &'a str, unit: OffsetUnit) -> Self {
        Self { text, unit, byte: 0 }
    }

    fn byte_offset(&self) -> usize {
        self.byte
    }

    /// Move forward `units`, clamped to the text and never stopping inside a
    /// character. Returns the new byte offset.
    fn advance(&mut self, units: usize) -> usize {
        let rest = &self.text[self.byte..];
        let mut taken = 0;
        let mut consumed = 0;
        for c in rest.chars() {
            if taken >= units {
                break;
            }
            taken += match self.unit {
                OffsetUnit::Utf16 => c.len_utf16(),
                OffsetUnit::Utf8 => c.len_utf8(),
            };
            consumed += c.len_utf8();
        }
        self.byte += consumed;
        self.byte
    }
}
