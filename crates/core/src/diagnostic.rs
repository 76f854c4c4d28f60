//! Syntax errors and source pointer diagrams.
//!
//! A [`SyntaxError`] renders like GraphQL.js errors:
//!
//! ```text
//! Syntax Error: Unterminated string.
//!
//! GraphQL request:1:13
//! 1 | { foo(arg: "
//!   |             ^
//! 2 | "
//! ```

use std::fmt;

use crate::{source::Source, utf16::LineIndex};

/// 1-based line and UTF-16 column inside a source body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

/// A lexical error with its position and the rendered pointer diagram.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Syntax Error: {description}\n\n{printed}")]
pub struct SyntaxError {
    description: String,
    location: SourceLocation,
    offset: usize,
    printed: String,
}

impl SyntaxError {
    /// Build an error at byte `offset` of `source`.
    pub(crate) fn new(
        source: &Source<'_>,
        index: &LineIndex<'_>,
        offset: usize,
        description: impl Into<String>,
    ) -> Self {
        let (line, column) = index.location(offset);
        let location = SourceLocation { line, column };
        Self {
            description: description.into(),
            location,
            offset,
            printed: print_source_location(source, location),
        }
    }

    /// Description without the `Syntax Error:` prefix, e.g. `Unterminated string.`.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// One-line message, e.g. `Syntax Error: Unterminated string.`.
    pub fn message(&self) -> String {
        format!("Syntax Error: {}", self.description)
    }

    /// Location within the body, not adjusted by the source's location offset.
    pub fn location(&self) -> SourceLocation {
        self.location
    }

    /// Byte offset within the body.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Lines longer than this are shown in chunks.
const MAX_LINE_WIDTH: usize = 120;
const CHUNK_WIDTH: usize = 80;

/// Render `name:line:column` followed by the surrounding lines and a caret.
///
/// The source's location offset shifts the printed line numbers, and for the first line also
/// the printed column.
pub fn print_source_location(source: &Source<'_>, location: SourceLocation) -> String {
    let offset = source.location_offset();
    let first_line_column_offset = offset.column.get() - 1;

    let line_index = location.line.saturating_sub(1);
    let line_num = location.line.saturating_add(offset.line.get() - 1);
    let column_offset = if location.line == 1 {
        first_line_column_offset
    } else {
        0
    };
    let column_num = location.column.saturating_add(column_offset);
    let header = format!("{}:{line_num}:{column_num}\n", source.name());

    let lines = split_lines(source.body());
    // Only the first line is shifted by the column offset.
    let display_line = |i: usize| {
        lines.get(i).map(|line| {
            if i == 0 {
                format!("{}{line}", " ".repeat(first_line_column_offset))
            } else {
                line.to_string()
            }
        })
    };
    let location_line = display_line(line_index).unwrap_or_default();
    let location_units: Vec<u16> = location_line.encode_utf16().collect();

    if location_units.len() > MAX_LINE_WIDTH {
        let sub_line_index = column_num / CHUNK_WIDTH;
        let sub_line_column_num = column_num % CHUNK_WIDTH;
        let sub_lines: Vec<String> = location_units
            .chunks(CHUNK_WIDTH)
            .map(String::from_utf16_lossy)
            .collect();

        let mut rows = vec![(format!("{line_num} |"), sub_lines.first().cloned())];
        rows.extend(
            sub_lines
                .iter()
                .skip(1)
                .take(sub_line_index)
                .map(|sub_line| ("|".to_string(), Some(sub_line.clone()))),
        );
        rows.push(("|".to_string(), Some(caret(sub_line_column_num))));
        rows.push(("|".to_string(), sub_lines.get(sub_line_index + 1).cloned()));
        return header + &print_prefixed_lines(&rows);
    }

    let previous = line_index.checked_sub(1).and_then(display_line);
    let next = display_line(line_index + 1);
    let rows = [
        (format!("{} |", line_num.saturating_sub(1)), previous),
        (format!("{line_num} |"), Some(location_line)),
        ("|".to_string(), Some(caret(column_num))),
        (format!("{} |", line_num.saturating_add(1)), next),
    ];
    header + &print_prefixed_lines(&rows)
}

/// `^` right-aligned to `width` columns.
fn caret(width: usize) -> String {
    format!("{}^", " ".repeat(width.saturating_sub(1)))
}

fn split_lines(body: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = body;
    while let Some(pos) = rest.find(['\r', '\n']) {
        lines.push(&rest[..pos]);
        let skip = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[pos + skip..];
    }
    lines.push(rest);
    lines
}

/// Right-align the gutters and drop rows with no line.
fn print_prefixed_lines(rows: &[(String, Option<String>)]) -> String {
    let present: Vec<(&str, &str)> = rows
        .iter()
        .filter_map(|(prefix, line)| line.as_deref().map(|line| (prefix.as_str(), line)))
        .collect();
    let pad_len = present
        .iter()
        .map(|(prefix, _)| prefix.len())
        .max()
        .unwrap_or(0);
    present
        .iter()
        .map(|(prefix, line)| {
            if line.is_empty() {
                format!("{prefix:>pad_len$}")
            } else {
                format!("{prefix:>pad_len$} {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
