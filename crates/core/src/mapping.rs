//! Sourcemap utilities for stripped documents.
//!
//! Stripping only deletes ignored characters, inserts single separators and shortens block
//! strings; every other byte of the output is copied from the input. The stripper records each
//! copied run as a [`Segment`], and the helpers here turn those runs into sourcemaps.
//!
//! Key ideas:
//!
//! - Internal offsets are byte-based.
//! - Sourcemap columns are emitted/consumed as UTF-16 code unit columns (matching typical JS
//!   sourcemap consumers).
//! - Output bytes outside every segment (separators, line breaks added to block strings) are
//!   inserted and have no origin of their own.
//!
//! Invariants:
//!
//! - `segments` are sorted by ascending `output` and by ascending `input`, and do not overlap
//!   on either side.

use std::cmp::Ordering;

use crate::{StripError, utf16::LineIndex};

/// A run of bytes copied verbatim from the input to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Byte offset of the run in the output.
    pub output: usize,
    /// Byte offset of the run in the input.
    pub input: usize,
    /// Length of the run in bytes.
    pub len: usize,
}

impl Segment {
    fn input_end(&self) -> usize {
        self.input + self.len
    }
}

/// Create a sourcemap mapping `output_code` back to `input_code`.
///
/// One mapping is emitted at the start of every segment, so each token of the output resolves
/// to the position of the same token in the input.
pub fn create_sourcemap(
    input_code: &str,
    output_code: &str,
    source_filename: &str,
    segments: &[Segment],
) -> Result<String, StripError> {
    let in_index = LineIndex::new(input_code);
    let out_index = LineIndex::new(output_code);

    let mut builder = sourcemap::SourceMapBuilder::new(None);
    builder.add_source(source_filename);
    builder.set_source_contents(0, Some(input_code));

    for segment in segments {
        if segment.output >= output_code.len() || segment.input >= input_code.len() {
            continue;
        }
        let (out_line, out_col) = out_index.byte_to_line_utf16_col(segment.output);
        let (in_line, in_col) = in_index.byte_to_line_utf16_col(segment.input);
        builder.add(
            out_line as u32,
            out_col as u32,
            in_line as u32,
            in_col as u32,
            Some(source_filename),
            None,
            false,
        );
    }

    write_sourcemap(builder.into_sourcemap())
}

/// Rewrite `input_sourcemap_json`, which maps `input_code` to its original sources, so it
/// maps `output_code` to the same original sources.
pub fn rewrite_sourcemap(
    input_code: &str,
    output_code: &str,
    input_sourcemap_json: &str,
    segments: &[Segment],
) -> Result<String, StripError> {
    let input_map = sourcemap::SourceMap::from_slice(input_sourcemap_json.as_bytes())?;

    let in_index = LineIndex::new(input_code);
    let out_index = LineIndex::new(output_code);

    let mut mappings: Vec<Mapping<'_>> = Vec::new();

    // Carry over every input mapping whose generated position survived stripping.
    for token in input_map.tokens() {
        let in_line = token.get_dst_line() as usize;
        let in_col = token.get_dst_col() as usize;

        let Some(in_byte) = in_index.line_utf16_col_to_byte(in_line, in_col) else {
            continue;
        };
        let Some(out_byte) = input_to_output(segments, in_byte) else {
            // The generated byte was ignored and removed.
            continue;
        };
        if out_byte >= output_code.len() {
            continue;
        }
        let (out_line, out_col) = out_index.byte_to_line_utf16_col(out_byte);

        mappings.push(Mapping {
            dst_line: out_line as u32,
            dst_col: out_col as u32,
            src_line: token.get_src_line(),
            src_col: token.get_src_col(),
            source: token.get_source(),
            name: token.get_name(),
        });
    }

    // Anchor every segment start, so a token whose input mapping began inside removed
    // characters still resolves to the enclosing original position.
    for segment in segments {
        if segment.output >= output_code.len() || segment.input >= input_code.len() {
            continue;
        }
        let (out_line, out_col) = out_index.byte_to_line_utf16_col(segment.output);
        let (in_line, in_col) = in_index.byte_to_line_utf16_col(segment.input);

        let tok = input_map.lookup_token(in_line as u32, in_col as u32);
        let (src_line, src_col, source, name) = match tok {
            Some(t) => (
                t.get_src_line(),
                t.get_src_col(),
                t.get_source(),
                t.get_name(),
            ),
            None => (u32::MAX, u32::MAX, None, None),
        };

        mappings.push(Mapping {
            dst_line: out_line as u32,
            dst_col: out_col as u32,
            src_line,
            src_col,
            source,
            name,
        });
    }

    sort_and_dedup_mappings(&mut mappings);

    let mut builder = sourcemap::SourceMapBuilder::new(None);
    for m in mappings {
        builder.add(
            m.dst_line, m.dst_col, m.src_line, m.src_col, m.source, m.name, false,
        );
    }

    write_sourcemap(builder.into_sourcemap())
}

fn write_sourcemap(map: sourcemap::SourceMap) -> Result<String, StripError> {
    let mut buf: Vec<u8> = Vec::new();
    map.to_writer(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Output byte for an input byte, if the input byte was copied.
fn input_to_output(segments: &[Segment], in_byte: usize) -> Option<usize> {
    let idx = segments.partition_point(|segment| segment.input_end() <= in_byte);
    let segment = segments.get(idx)?;
    (segment.input <= in_byte).then(|| segment.output + (in_byte - segment.input))
}

/// A single point mapping entry (destination -> original source).
///
/// `u32::MAX` in a source position means unmapped.
#[derive(Debug, Clone, Copy)]
struct Mapping<'a> {
    dst_line: u32,
    dst_col: u32,
    src_line: u32,
    src_col: u32,
    source: Option<&'a str>,
    name: Option<&'a str>,
}

/// Sort by destination and keep one entry per destination, preferring mapped entries.
fn sort_and_dedup_mappings(mappings: &mut Vec<Mapping<'_>>) {
    // Stable sort: for equal mapped entries the first pushed wins.
    mappings.sort_by(
        |a, b| match (a.dst_line, a.dst_col).cmp(&(b.dst_line, b.dst_col)) {
            Ordering::Equal => {
                let a_mapped = a.src_line != u32::MAX;
                let b_mapped = b.src_line != u32::MAX;
                b_mapped.cmp(&a_mapped)
            }
            other => other,
        },
    );
    mappings.dedup_by(|a, b| a.dst_line == b.dst_line && a.dst_col == b.dst_col);
}
