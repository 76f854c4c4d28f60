//! Block string decoding and minimal re-encoding.
//!
//! A block string's value is derived from its raw body (the text between the `"""` delimiters):
//!
//! 1. split into lines on `\n`, `\r\n` or `\r`;
//! 2. find the common indentation (spaces/tabs) of every line but the first that has content;
//! 3. remove that indentation from every line but the first;
//! 4. drop leading and trailing lines that are entirely spaces/tabs;
//! 5. join with `\n` and unescape `\"""` to `"""`.
//!
//! [`minimize_block_string`] applies steps 1-4 to the raw body as plain deletions, so escapes
//! are kept byte for byte, then guards the two places where the shortened text would read back
//! differently: a first line that now looks indented relative to the rest, and a final
//! character that would merge with the closing delimiter.

/// The escaped form of a triple quote inside a block string.
const ESCAPED_TRIPLE_QUOTE: &str = "\\\"\"\"";
const TRIPLE_QUOTE: &str = "\"\"\"";

/// Split on the language's line terminators.
pub fn split_lines(body: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = body.as_bytes();
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' | b'\n' => {
                lines.push(&body[start..i]);
                i += if bytes[i] == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
                    2
                } else {
                    1
                };
                start = i;
            }
            _ => i += 1,
        }
    }
    lines.push(&body[start..]);
    lines
}

fn leading_whitespace(line: &str) -> usize {
    line.bytes().take_while(|b| matches!(b, b' ' | b'\t')).count()
}

fn is_blank(line: &str) -> bool {
    leading_whitespace(line) == line.len()
}

/// Smallest indentation among non-first lines with content, if any has content.
pub fn common_indent(lines: &[&str]) -> Option<usize> {
    lines
        .iter()
        .skip(1)
        .filter(|line| !is_blank(line))
        .map(|line| leading_whitespace(line))
        .min()
}

/// Steps 2-4: remove the common indentation and the surrounding blank lines.
pub fn dedent_lines<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let indent = common_indent(lines).unwrap_or(0);
    let Some(first) = lines.iter().position(|line| !is_blank(line)) else {
        return Vec::new();
    };
    let last = lines.iter().rposition(|line| !is_blank(line)).unwrap_or(first);

    lines
        .iter()
        .enumerate()
        .skip(first)
        .take(last + 1 - first)
        .map(|(i, &line)| {
            if i == 0 {
                line
            } else {
                // Lines shorter than the indent are blank, so any cut inside them is a boundary.
                &line[indent.min(line.len())..]
            }
        })
        .collect()
}

/// Decode a raw block string body into its value.
pub fn block_string_value(raw: &str) -> String {
    dedent_lines(&split_lines(raw))
        .join("\n")
        .replace(ESCAPED_TRIPLE_QUOTE, TRIPLE_QUOTE)
}

/// Shortest raw body that decodes to the same value as `raw`.
///
/// `raw` must be a body the lexer accepted: it never contains an unescaped `"""`.
pub fn minimize_block_string(raw: &str) -> String {
    minimize_block_string_with_offsets(raw).0
}

/// [`minimize_block_string`], also returning where each kept line came from.
///
/// Each pair is `(output_offset, input_offset)`: the byte offset of a kept line within the
/// minimized body and within `raw`. Every kept line is copied verbatim, so offsets inside a
/// line translate by the same delta.
pub fn minimize_block_string_with_offsets(raw: &str) -> (String, Vec<(usize, usize)>) {
    let lines = dedent_lines(&split_lines(raw));

    let mut body = String::with_capacity(raw.len());
    let mut offsets = Vec::with_capacity(lines.len());
    // Once leading blank lines are gone, an indented line may have become the first line;
    // re-reading would then dedent the lines after it. A leading line break restores the
    // original first line as a non-first one.
    if common_indent(&lines).is_some_and(|indent| indent > 0) {
        body.push('\n');
    }
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            body.push('\n');
        }
        // Kept lines are subslices of `raw`.
        offsets.push((body.len(), line.as_ptr() as usize - raw.as_ptr() as usize));
        body.push_str(line);
    }

    // A trailing `"` or `\` would merge with the closing `"""`.
    let ends_with_escape = body.ends_with(ESCAPED_TRIPLE_QUOTE);
    if (body.ends_with('"') && !ends_with_escape) || body.ends_with('\\') {
        body.push('\n');
    }
    (body, offsets)
}
