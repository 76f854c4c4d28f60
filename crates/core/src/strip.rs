//! Ignored-character stripping with optional sourcemap support.
//!
//! This module rewrites a GraphQL document into its most compact equivalent form. Tokens are
//! pulled from the [`Lexer`] one at a time; ignored tokens (whitespace, line terminators, commas,
//! comments, the BOM) are dropped and every other token is printed back to back.
//!
//! Separators:
//!
//! - Two non-punctuators (names, numbers, strings) need a space, otherwise they would re-lex as
//!   one token: `a b`, `1 2`, `"x" y`.
//! - A non-punctuator followed by `...` also needs one, otherwise `1...` would read as a float
//!   with a bad fraction: `1 ...`, `a ...`.
//! - Everything else is self-delimiting: `{a}`, `$b:Int!`, `......`.
//!
//! Tokens are copied verbatim, so string contents are never touched. Block strings are the
//! only exception: they are re-encoded to the shortest body with the same value (see
//! [`crate::block_string`]).
//!
//! Only lexical validity is checked. A document with unbalanced brackets still strips.

use crate::{
    StripError,
    block_string::minimize_block_string_with_offsets,
    lexer::Lexer,
    mapping::{Segment, create_sourcemap, rewrite_sourcemap},
    source::Source,
    token::{Token, TokenClass, TokenKind},
};

/// Output code and its corresponding sourcemap JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAndSourcemap {
    /// The stripped document.
    pub code: String,
    /// The generated/re-written sourcemap JSON.
    pub sourcemap: String,
}

/// Strip ignored characters from a document.
///
/// Accepts anything convertible to a [`Source`]: `&str`, `String`, or a `Source` with a name
/// and location offset used in error messages.
///
/// ```
/// use graphql_strip_ignored::strip_ignored_characters;
///
/// let stripped = strip_ignored_characters("query Q { a, b # comment\n }").unwrap();
/// assert_eq!(stripped, "query Q{a b}");
/// ```
pub fn strip_ignored_characters<'a>(source: impl Into<Source<'a>>) -> Result<String, StripError> {
    let source = source.into();
    let (code, _) = rewrite(&source)?;
    Ok(code)
}

/// Strip ignored characters and create a brand-new sourcemap.
///
/// The sourcemap maps every token of the output back to the same token in `source`; the
/// source's name is used as the sourcemap's source file.
pub fn strip_ignored_characters_with_sourcemap<'a>(
    source: impl Into<Source<'a>>,
) -> Result<CodeAndSourcemap, StripError> {
    let source = source.into();
    let (code, segments) = rewrite(&source)?;
    let sourcemap = create_sourcemap(source.body(), &code, source.name(), &segments)?;
    Ok(CodeAndSourcemap { code, sourcemap })
}

/// Strip ignored characters and rewrite an existing sourcemap.
///
/// `input_sourcemap_json` maps `source` to its original sources (e.g. a document extracted
/// from a larger file); the returned sourcemap maps the stripped output to those same
/// original sources.
pub fn strip_ignored_characters_rewrite_sourcemap<'a>(
    source: impl Into<Source<'a>>,
    input_sourcemap_json: &str,
) -> Result<CodeAndSourcemap, StripError> {
    let source = source.into();
    let (code, segments) = rewrite(&source)?;
    let sourcemap = rewrite_sourcemap(source.body(), &code, input_sourcemap_json, &segments)?;
    Ok(CodeAndSourcemap { code, sourcemap })
}

/// Whether a space must separate two adjacent significant tokens.
pub fn needs_separator(previous: TokenKind, next: TokenKind) -> bool {
    use TokenClass::*;
    match (previous.class(), next.class()) {
        (Terminator, _) | (_, Terminator) => false,
        (NonPunctuator, NonPunctuator) => true,
        (NonPunctuator, Punctuator) => next == TokenKind::Spread,
        _ => false,
    }
}

/// Lex `source` and print its significant tokens, returning `(output, segments)`.
///
/// This is the shared core used by all public entry points.
fn rewrite(source: &Source<'_>) -> Result<(String, Vec<Segment>), StripError> {
    let mut stripper = Stripper::with_capacity(source.body().len());
    let mut lexer = Lexer::new(source);

    loop {
        let token = lexer.next_token()?;
        if token.kind == TokenKind::Eof {
            break;
        }
        stripper.push(&token);
    }

    tracing::debug!(
        source = source.name(),
        input_len = source.body().len(),
        output_len = stripper.out.len(),
        tokens = stripper.printed,
        "stripped ignored characters"
    );
    Ok((stripper.out, stripper.segments))
}

/// Output state of one strip pass.
///
/// `previous` is the kind of the last printed token; ignored tokens never touch it.
#[derive(Debug, Default)]
struct Stripper {
    out: String,
    segments: Vec<Segment>,
    previous: Option<TokenKind>,
    printed: usize,
}

impl Stripper {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
            ..Self::default()
        }
    }

    fn push(&mut self, token: &Token<'_>) {
        if token.kind.is_ignored() {
            return;
        }
        if self
            .previous
            .is_some_and(|previous| needs_separator(previous, token.kind))
        {
            self.out.push(' ');
        }
        self.print_token(token);
        self.previous = Some(token.kind);
        self.printed += 1;
    }

    fn print_token(&mut self, token: &Token<'_>) {
        let Some(body) = token.block_body() else {
            self.copy(token.raw, token.start);
            return;
        };

        let (minimized, lines) = minimize_block_string_with_offsets(body);
        tracing::trace!(
            line = token.line,
            column = token.column,
            before = body.len(),
            after = minimized.len(),
            "re-encoded block string"
        );

        let body_start = token.start + 3;
        self.copy("\"\"\"", token.start);
        let out_body_start = self.out.len();
        for (i, &(out_offset, in_offset)) in lines.iter().enumerate() {
            let out_end = lines
                .get(i + 1)
                .map_or(minimized.len(), |&(next_out, _)| next_out);
            // A kept line runs up to the next line break.
            let len = minimized[out_offset..out_end]
                .find('\n')
                .unwrap_or(out_end - out_offset);
            self.segments.push(Segment {
                output: out_body_start + out_offset,
                input: body_start + in_offset,
                len,
            });
        }
        self.out.push_str(&minimized);
        self.copy("\"\"\"", token.end() - 3);
    }

    /// Append `text`, which appears verbatim at byte `input` of the source.
    fn copy(&mut self, text: &str, input: usize) {
        self.segments.push(Segment {
            output: self.out.len(),
            input,
            len: text.len(),
        });
        self.out.push_str(text);
    }
}
