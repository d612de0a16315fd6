//! Fix Emitter
//!
//! Turns line records into mismatches and minimal text edits. Each edit
//! replaces exactly the leading-whitespace span of one line, so the edits of
//! one pass never overlap and can be applied in any order.

use serde::Serialize;

use crate::config::IndentOptions;
use crate::engine::resolver::LineRecord;
use crate::syntax::{TokenId, TokenStream};

/// A line whose observed indentation differs from the expected one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub line: usize,
    pub token: TokenId,
    pub expected_text: String,
    pub actual_text: String,
    /// Byte span of the line's leading whitespace
    pub span: (usize, usize),
}

/// A replacement of one byte span with new text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

/// Compare a resolved record against the source. Comparison is strict text
/// equality: indentation in the wrong character is a mismatch even when it
/// lands on the right column.
pub fn mismatch_for(
    record: &LineRecord,
    stream: &TokenStream<'_>,
    options: &IndentOptions,
) -> Option<Mismatch> {
    let (start, end) = stream.leading_whitespace_span(record.line)?;
    let actual_text = stream.source()[start..end].to_string();
    let expected_text = options.unit.text_for(record.expected_column);
    if expected_text == actual_text {
        return None;
    }
    Some(Mismatch {
        line: record.line,
        token: record.first_token,
        expected_text,
        actual_text,
        span: (start, end),
    })
}

/// The edit that rewrites a mismatched line's leading whitespace.
pub fn edit_for(mismatch: &Mismatch) -> TextEdit {
    TextEdit {
        start: mismatch.span.0,
        end: mismatch.span.1,
        replacement: mismatch.expected_text.clone(),
    }
}

/// Apply disjoint edits to a source text in one pass. Edits may be given in
/// any order; overlapping or out-of-range edits are dropped.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> String {
    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by_key(|edit| edit.start);

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in ordered {
        if edit.start < cursor || edit.end < edit.start || edit.end > source.len() {
            continue;
        }
        out.push_str(&source[cursor..edit.start]);
        out.push_str(&edit.replacement);
        cursor = edit.end;
    }
    out.push_str(&source[cursor..]);
    out
}
