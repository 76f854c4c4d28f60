//! Line/column indexing with UTF-16 columns.
//!
//! The crate works on byte offsets internally, while the positions it reports (token locations,
//! syntax errors, sourcemaps) use 1-based lines and columns measured in **UTF-16 code units**, the
//! unit used by GraphQL.js and by JavaScript sourcemap consumers.
//!
//! Line breaks are the language's line terminators: `\n`, `\r\n` and a lone `\r`. The terminator
//! itself never contributes to a column; an offset pointing at a terminator clamps to the end of
//! its line.

use std::cmp::Ordering;

/// Byte offsets where each line starts. Always begins with `0`.
pub fn line_starts(s: &str) -> Vec<usize> {
    let bytes = s.as_bytes();
    let mut starts = vec![0usize];
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                starts.push(i + 2);
                i += 2;
            }
            b'\r' | b'\n' => {
                starts.push(i + 1);
                i += 1;
            }
            _ => i += 1,
        }
    }
    starts
}

/// Precomputed line table for one string.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    s: &'a str,
    lines: Vec<LineSpan>,
}

/// Byte range of a line's content, terminator excluded.
#[derive(Debug, Clone, Copy)]
struct LineSpan {
    start: usize,
    end: usize,
    /// ASCII-only lines convert columns by subtraction.
    ascii: bool,
}

impl<'a> LineIndex<'a> {
    pub fn new(s: &'a str) -> Self {
        let starts = line_starts(s);
        let bytes = s.as_bytes();
        let lines = starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let mut end = starts.get(i + 1).copied().unwrap_or(s.len());
                // Trim the terminator that opened the next line.
                if end > start && bytes[end - 1] == b'\n' {
                    end -= 1;
                }
                if end > start && bytes[end - 1] == b'\r' {
                    end -= 1;
                }
                LineSpan {
                    start,
                    end,
                    ascii: s[start..end].is_ascii(),
                }
            })
            .collect();
        Self { s, lines }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// 0-based line containing `byte`. Offsets past the end land on the last line.
    pub fn line_for_byte(&self, byte: usize) -> usize {
        match self.lines.binary_search_by(|line| {
            if line.start <= byte {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }) {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) => i - 1,
        }
    }

    /// 0-based `(line, utf16_col)` for a byte offset.
    ///
    /// Offsets inside a multi-byte character clamp to that character's start.
    pub fn byte_to_line_utf16_col(&self, byte: usize) -> (usize, usize) {
        let line = self.line_for_byte(byte);
        let span = self.lines[line];
        let clamped = byte.clamp(span.start, span.end);
        if span.ascii {
            return (line, clamped - span.start);
        }
        let col = self.s[span.start..span.end]
            .char_indices()
            .take_while(|&(rel, ch)| span.start + rel + ch.len_utf8() <= clamped)
            .map(|(_, ch)| ch.len_utf16())
            .sum();
        (line, col)
    }

    /// 1-based `(line, column)` for a byte offset.
    pub fn location(&self, byte: usize) -> (usize, usize) {
        let (line, col) = self.byte_to_line_utf16_col(byte);
        (line + 1, col + 1)
    }

    /// Byte offset for a 0-based `(line, utf16_col)`.
    ///
    /// Columns past the line end clamp to it; a column inside a surrogate pair clamps to the
    /// start of the code point. Returns `None` for a line that does not exist.
    pub fn line_utf16_col_to_byte(&self, line: usize, utf16_col: usize) -> Option<usize> {
        let span = *self.lines.get(line)?;
        if span.ascii {
            return Some((span.start + utf16_col).min(span.end));
        }
        let mut col = 0usize;
        for (rel, ch) in self.s[span.start..span.end].char_indices() {
            if col + ch.len_utf16() > utf16_col {
                return Some(span.start + rel);
            }
            col += ch.len_utf16();
        }
        Some(span.end)
    }
}
