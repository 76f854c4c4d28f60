//! Tokenizer.
//!
//! Fixed lexemes (punctuators, names, ignored characters) are matched by a `logos` automaton.
//! Numbers, strings and block strings are recognised by their first character and finished by
//! callbacks that scan the rest by hand, because their validation rules (escape sequences,
//! "no digit after a leading zero", "no name right after a number") need precise error
//! positions that a pure regex match cannot provide.
//!
//! The lexer yields ignored tokens as well as significant ones; callers decide what to skip.
//! It only checks lexical validity: a document with unbalanced brackets tokenizes fine.

use logos::Logos;

use crate::{
    diagnostic::SyntaxError,
    source::Source,
    token::{Token, TokenKind},
    utf16::LineIndex,
};

/// Why a lexeme was rejected.
///
/// Logos needs a `Default` error for input no pattern matches; that case is described later
/// from the offending character.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum LexFailure {
    #[default]
    UnexpectedCharacter,
    At {
        offset: usize,
        description: String,
    },
}

impl LexFailure {
    fn at(offset: usize, description: impl Into<String>) -> Self {
        LexFailure::At {
            offset,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberKind {
    Int,
    Float,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexFailure)]
enum Lexeme {
    #[token("\u{feff}")]
    Bom,
    #[regex(r"[ \t]+")]
    Whitespace,
    #[regex(r"\r\n|\r|\n")]
    LineTerminator,
    #[regex(r"#[^\r\n]*")]
    Comment,
    #[token(",")]
    Comma,

    #[token("!")]
    Bang,
    #[token("$")]
    Dollar,
    #[token("&")]
    Amp,
    #[token("(")]
    ParenL,
    #[token(")")]
    ParenR,
    #[token("...")]
    Spread,
    #[token(":")]
    Colon,
    #[token("=")]
    Equals,
    #[token("@")]
    At,
    #[token("[")]
    BracketL,
    #[token("]")]
    BracketR,
    #[token("{")]
    BraceL,
    #[token("|")]
    Pipe,
    #[token("}")]
    BraceR,

    #[regex(r"[_A-Za-z][_0-9A-Za-z]*")]
    Name,
    #[token("-", lex_number)]
    #[regex(r"[0-9]", lex_number)]
    Number(NumberKind),
    #[token("\"", lex_string)]
    String,
    #[token("\"\"\"", lex_block_string)]
    BlockString,
}

impl Lexeme {
    fn kind(self) -> TokenKind {
        match self {
            Lexeme::Bom => TokenKind::Bom,
            Lexeme::Whitespace => TokenKind::Whitespace,
            Lexeme::LineTerminator => TokenKind::LineTerminator,
            Lexeme::Comment => TokenKind::Comment,
            Lexeme::Comma => TokenKind::Comma,
            Lexeme::Bang => TokenKind::Bang,
            Lexeme::Dollar => TokenKind::Dollar,
            Lexeme::Amp => TokenKind::Amp,
            Lexeme::ParenL => TokenKind::ParenL,
            Lexeme::ParenR => TokenKind::ParenR,
            Lexeme::Spread => TokenKind::Spread,
            Lexeme::Colon => TokenKind::Colon,
            Lexeme::Equals => TokenKind::Equals,
            Lexeme::At => TokenKind::At,
            Lexeme::BracketL => TokenKind::BracketL,
            Lexeme::BracketR => TokenKind::BracketR,
            Lexeme::BraceL => TokenKind::BraceL,
            Lexeme::Pipe => TokenKind::Pipe,
            Lexeme::BraceR => TokenKind::BraceR,
            Lexeme::Name => TokenKind::Name,
            Lexeme::Number(NumberKind::Int) => TokenKind::Int,
            Lexeme::Number(NumberKind::Float) => TokenKind::Float,
            Lexeme::String => TokenKind::String,
            Lexeme::BlockString => TokenKind::BlockString,
        }
    }
}

/// Advance the logos cursor so the current token ends at absolute byte `end`.
fn finish_at(lex: &mut logos::Lexer<'_, Lexeme>, end: usize) {
    let current = lex.span().end;
    if end > current {
        lex.bump(end - current);
    }
}

fn is_name_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

/// `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`, not followed by `.` or a name start.
fn lex_number(lex: &mut logos::Lexer<'_, Lexeme>) -> Result<NumberKind, LexFailure> {
    let source = lex.source();
    let bytes = source.as_bytes();
    let mut pos = lex.span().start;
    let mut kind = NumberKind::Int;

    if bytes.get(pos) == Some(&b'-') {
        pos += 1;
    }

    if bytes.get(pos) == Some(&b'0') {
        pos += 1;
        if bytes.get(pos).is_some_and(u8::is_ascii_digit) {
            return Err(LexFailure::at(
                pos,
                format!(
                    "Invalid number, unexpected digit after 0: {}.",
                    describe_char_at(source, pos)
                ),
            ));
        }
    } else {
        pos = read_digits(source, pos)?;
    }

    if bytes.get(pos) == Some(&b'.') {
        kind = NumberKind::Float;
        pos = read_digits(source, pos + 1)?;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        kind = NumberKind::Float;
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        pos = read_digits(source, pos)?;
    }

    if bytes
        .get(pos)
        .is_some_and(|&b| b == b'.' || is_name_start(b))
    {
        return Err(expected_digit(source, pos));
    }

    finish_at(lex, pos);
    Ok(kind)
}

/// One or more digits starting at `pos`; returns the offset after them.
fn read_digits(source: &str, pos: usize) -> Result<usize, LexFailure> {
    let digits = source.as_bytes()[pos.min(source.len())..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return Err(expected_digit(source, pos));
    }
    Ok(pos + digits)
}

fn expected_digit(source: &str, pos: usize) -> LexFailure {
    LexFailure::at(
        pos,
        format!(
            "Invalid number, expected digit but got: {}.",
            describe_char_at(source, pos)
        ),
    )
}

/// `"` ... `"` on a single line, with validated escapes.
fn lex_string(lex: &mut logos::Lexer<'_, Lexeme>) -> Result<(), LexFailure> {
    let source = lex.source();
    let bytes = source.as_bytes();
    let mut pos = lex.span().end;

    while let Some(&b) = bytes.get(pos) {
        match b {
            b'"' => {
                finish_at(lex, pos + 1);
                return Ok(());
            }
            b'\\' => pos += escape_len(source, pos)?,
            b'\n' | b'\r' => break,
            _ => pos += 1,
        }
    }

    Err(LexFailure::at(pos, "Unterminated string."))
}

/// Byte length of the escape sequence starting with the `\` at `pos`.
fn escape_len(source: &str, pos: usize) -> Result<usize, LexFailure> {
    let bytes = source.as_bytes();
    match bytes.get(pos + 1) {
        Some(b'u') if bytes.get(pos + 2) == Some(&b'{') => unicode_escape_braced(source, pos),
        Some(b'u') => unicode_escape_fixed(source, pos),
        Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => Ok(2),
        _ => Err(LexFailure::at(
            pos,
            format!(
                "Invalid character escape sequence: \"{}\".",
                prefix_chars(source, pos, 2)
            ),
        )),
    }
}

fn hex_value(b: Option<&u8>) -> Option<u32> {
    b.and_then(|&b| (b as char).to_digit(16))
}

/// Four hex digits after `offset`, as one UTF-16 code unit.
fn read_hex4(bytes: &[u8], offset: usize) -> Option<u32> {
    (offset..offset + 4).try_fold(0u32, |acc, i| Some((acc << 4) | hex_value(bytes.get(i))?))
}

fn is_scalar_value(code: u32) -> bool {
    char::from_u32(code).is_some()
}

/// `\uXXXX`, or a `\uXXXX\uXXXX` surrogate pair.
fn unicode_escape_fixed(source: &str, pos: usize) -> Result<usize, LexFailure> {
    let bytes = source.as_bytes();
    if let Some(code) = read_hex4(bytes, pos + 2) {
        if is_scalar_value(code) {
            return Ok(6);
        }
        if (0xD800..=0xDBFF).contains(&code)
            && bytes.get(pos + 6) == Some(&b'\\')
            && bytes.get(pos + 7) == Some(&b'u')
            && read_hex4(bytes, pos + 8).is_some_and(|low| (0xDC00..=0xDFFF).contains(&low))
        {
            return Ok(12);
        }
    }
    Err(invalid_unicode_escape(source, pos, 6))
}

/// `\u{X...}`: one to eight hex digits, a Unicode scalar value.
fn unicode_escape_braced(source: &str, pos: usize) -> Result<usize, LexFailure> {
    let bytes = source.as_bytes();
    let mut point: i32 = 0;
    let mut size = 3usize;
    // Never longer than `\u{00000000}`.
    while size < 12 {
        let b = bytes.get(pos + size);
        size += 1;
        if b == Some(&b'}') {
            if size < 5 || !u32::try_from(point).is_ok_and(is_scalar_value) {
                break;
            }
            return Ok(size);
        }
        match hex_value(b) {
            // Shifting mirrors 32-bit arithmetic: overflow turns the value negative.
            Some(digit) => point = point.wrapping_shl(4) | digit as i32,
            None => break,
        }
        if point < 0 {
            break;
        }
    }
    Err(invalid_unicode_escape(source, pos, size))
}

fn invalid_unicode_escape(source: &str, pos: usize, len: usize) -> LexFailure {
    LexFailure::at(
        pos,
        format!(
            "Invalid Unicode escape sequence: \"{}\".",
            prefix_chars(source, pos, len)
        ),
    )
}

/// `"""` ... `"""`, where `\"""` does not close the string.
fn lex_block_string(lex: &mut logos::Lexer<'_, Lexeme>) -> Result<(), LexFailure> {
    let source = lex.source();
    let bytes = source.as_bytes();
    let mut pos = lex.span().end;

    while pos < bytes.len() {
        let rest = &bytes[pos..];
        if rest.starts_with(b"\"\"\"") {
            finish_at(lex, pos + 3);
            return Ok(());
        }
        pos += if rest.starts_with(b"\\\"\"\"") { 4 } else { 1 };
    }

    Err(LexFailure::at(bytes.len(), "Unterminated string."))
}

/// Up to `count` characters of `source` starting at byte `pos`.
fn prefix_chars(source: &str, pos: usize, count: usize) -> &str {
    let rest = source.get(pos..).unwrap_or("");
    let end = rest
        .char_indices()
        .nth(count)
        .map_or(rest.len(), |(i, _)| i);
    &rest[..end]
}

/// How error messages quote a character: `"a"`, `'"'`, `U+00E9`, or `<EOF>`.
pub fn describe_char_at(source: &str, pos: usize) -> String {
    match source.get(pos..).and_then(|rest| rest.chars().next()) {
        None => TokenKind::Eof.description().to_string(),
        Some('"') => "'\"'".to_string(),
        Some(c @ ' '..='~') => format!("\"{c}\""),
        Some(c) => format!("U+{:04X}", c as u32),
    }
}

/// Streaming tokenizer over one [`Source`].
pub struct Lexer<'a> {
    source: &'a Source<'a>,
    inner: logos::Lexer<'a, Lexeme>,
    index: LineIndex<'a>,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        Self {
            source,
            inner: Lexeme::lexer(source.body()),
            index: LineIndex::new(source.body()),
            done: false,
        }
    }

    pub fn source(&self) -> &'a Source<'a> {
        self.source
    }

    /// Next token, ignored ones included. Returns [`TokenKind::Eof`] once input is exhausted,
    /// and keeps returning it.
    pub fn next_token(&mut self) -> Result<Token<'a>, SyntaxError> {
        let body: &'a str = self.source.body();
        let Some(result) = self.inner.next() else {
            return Ok(self.token(TokenKind::Eof, body.len(), ""));
        };
        let span = self.inner.span();
        match result {
            Ok(lexeme) => Ok(self.token(lexeme.kind(), span.start, &body[span.clone()])),
            Err(LexFailure::At {
                offset,
                description,
            }) => Err(self.error(offset, description)),
            Err(LexFailure::UnexpectedCharacter) => {
                let description = if body[span.start..].starts_with('\'') {
                    "Unexpected single quote character ('), did you mean to use a double quote (\")?"
                        .to_string()
                } else {
                    format!(
                        "Unexpected character: {}.",
                        describe_char_at(body, span.start)
                    )
                };
                Err(self.error(span.start, description))
            }
        }
    }

    fn token(&self, kind: TokenKind, start: usize, raw: &'a str) -> Token<'a> {
        let (line, column) = self.index.location(start);
        Token {
            kind,
            raw,
            start,
            line,
            column,
        }
    }

    fn error(&self, offset: usize, description: String) -> SyntaxError {
        let err = SyntaxError::new(self.source, &self.index, offset, description);
        tracing::debug!(
            source = self.source.name(),
            line = err.location().line,
            column = err.location().column,
            "lexing failed: {}",
            err.description()
        );
        err
    }
}

/// Yields every token up to and including [`TokenKind::Eof`], or up to the first error.
impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_token();
        self.done = !matches!(&result, Ok(token) if token.kind != TokenKind::Eof);
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(body: &str) -> Vec<TokenKind> {
        let source = Source::new(body);
        Lexer::new(&source)
            .map(|token| token.unwrap().kind)
            .collect()
    }

    fn lex_one(body: &str) -> (TokenKind, String) {
        let source = Source::new(body);
        let mut lexer = Lexer::new(&source);
        let token = lexer.next_token().unwrap();
        (token.kind, token.raw.to_string())
    }

    fn lex_error(body: &str) -> (String, usize, usize) {
        let source = Source::new(body);
        let err = Lexer::new(&source)
            .find_map(Result::err)
            .expect("expected a syntax error");
        (
            err.description().to_string(),
            err.location().line,
            err.location().column,
        )
    }

    /// Every punctuator is recognised, including the three-character spread.
    #[test]
    fn lexes_punctuators() {
        use TokenKind::*;
        assert_eq!(
            kinds("!$&()...:=@[]{|}"),
            vec![
                Bang, Dollar, Amp, ParenL, ParenR, Spread, Colon, Equals, At, BracketL, BracketR,
                BraceL, Pipe, BraceR, Eof
            ]
        );
    }

    /// Ignored characters come through as their own tokens.
    #[test]
    fn lexes_ignored_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds("\u{feff} \t\r\n\r\n# c\n,"),
            vec![
                Bom,
                Whitespace,
                LineTerminator,
                LineTerminator,
                LineTerminator,
                Comment,
                LineTerminator,
                Comma,
                Eof
            ]
        );
    }

    /// Numbers are split into ints and floats.
    #[test]
    fn lexes_numbers() {
        assert_eq!(lex_one("4"), (TokenKind::Int, "4".into()));
        assert_eq!(lex_one("-0"), (TokenKind::Int, "-0".into()));
        assert_eq!(
            lex_one("9007199254740993"),
            (TokenKind::Int, "9007199254740993".into())
        );
        assert_eq!(lex_one("4.123"), (TokenKind::Float, "4.123".into()));
        assert_eq!(lex_one("-1.123e4"), (TokenKind::Float, "-1.123e4".into()));
        assert_eq!(lex_one("1E-4 "), (TokenKind::Float, "1E-4".into()));
        assert_eq!(lex_one("0.0e+0"), (TokenKind::Float, "0.0e+0".into()));
    }

    /// Malformed numbers report the offending character.
    #[test]
    fn rejects_bad_numbers() {
        assert_eq!(
            lex_error("00"),
            ("Invalid number, unexpected digit after 0: \"0\".".into(), 1, 2)
        );
        assert_eq!(
            lex_error("+1"),
            ("Unexpected character: \"+\".".into(), 1, 1)
        );
        assert_eq!(
            lex_error("1."),
            ("Invalid number, expected digit but got: <EOF>.".into(), 1, 3)
        );
        assert_eq!(
            lex_error("1.A"),
            ("Invalid number, expected digit but got: \"A\".".into(), 1, 3)
        );
        assert_eq!(
            lex_error("-A"),
            ("Invalid number, expected digit but got: \"A\".".into(), 1, 2)
        );
        assert_eq!(
            lex_error("1.0e"),
            ("Invalid number, expected digit but got: <EOF>.".into(), 1, 5)
        );
        assert_eq!(
            lex_error("1..."),
            ("Invalid number, expected digit but got: \".\".".into(), 1, 3)
        );
        assert_eq!(
            lex_error("1_"),
            ("Invalid number, expected digit but got: \"_\".".into(), 1, 2)
        );
    }

    /// Strings keep their raw text, escapes included.
    #[test]
    fn lexes_strings() {
        assert_eq!(lex_one("\"\""), (TokenKind::String, "\"\"".into()));
        assert_eq!(
            lex_one(r#""quote \" \\ \/ \b \f \n \r \t""#),
            (TokenKind::String, r#""quote \" \\ \/ \b \f \n \r \t""#.into())
        );
        assert_eq!(
            lex_one(r#""\u1234 \u{1F600} \uD83D\uDE00""#),
            (TokenKind::String, r#""\u1234 \u{1F600} \uD83D\uDE00""#.into())
        );
        assert_eq!(
            lex_one("\"contains , and #\""),
            (TokenKind::String, "\"contains , and #\"".into())
        );
    }

    /// Broken strings point at the problem.
    #[test]
    fn rejects_bad_strings() {
        assert_eq!(lex_error("\""), ("Unterminated string.".into(), 1, 2));
        assert_eq!(lex_error("\"no end\nx\""), ("Unterminated string.".into(), 1, 8));
        assert_eq!(
            lex_error(r#""bad \z esc""#),
            ("Invalid character escape sequence: \"\\z\".".into(), 1, 6)
        );
        assert_eq!(
            lex_error(r#""bad \u1 esc""#),
            ("Invalid Unicode escape sequence: \"\\u1 es\".".into(), 1, 6)
        );
        assert_eq!(
            lex_error(r#""\uD83D""#),
            ("Invalid Unicode escape sequence: \"\\uD83D\".".into(), 1, 2)
        );
        assert_eq!(
            lex_error(r#""\u{}""#),
            ("Invalid Unicode escape sequence: \"\\u{}\".".into(), 1, 2)
        );
        assert_eq!(
            lex_error(r#""\u{110000}""#),
            ("Invalid Unicode escape sequence: \"\\u{110000}\".".into(), 1, 2)
        );
    }

    /// Block strings span lines and honour the escaped delimiter.
    #[test]
    fn lexes_block_strings() {
        assert_eq!(
            lex_one("\"\"\"a\n \\\"\"\" b\"\"\""),
            (TokenKind::BlockString, "\"\"\"a\n \\\"\"\" b\"\"\"".into())
        );
        assert_eq!(
            lex_one("\"\"\"\"\"\""),
            (TokenKind::BlockString, "\"\"\"\"\"\"".into())
        );
        assert_eq!(lex_error("\"\"\"a\n"), ("Unterminated string.".into(), 2, 1));
    }

    /// Unknown characters are rejected with a readable rendering.
    #[test]
    fn rejects_unexpected_characters() {
        assert_eq!(lex_error(".."), ("Unexpected character: \".\".".into(), 1, 1));
        assert_eq!(lex_error("é"), ("Unexpected character: U+00E9.".into(), 1, 1));
        assert_eq!(
            lex_error("'a'"),
            (
                "Unexpected single quote character ('), did you mean to use a double quote (\")?"
                    .into(),
                1,
                1
            )
        );
        assert_eq!(lex_error("a\n  ?"), ("Unexpected character: \"?\".".into(), 2, 3));
    }

    /// Positions are 1-based and columns count UTF-16 units.
    #[test]
    fn tracks_positions() {
        let source = Source::new("a\r\n  \"🙂\" b\r\"\"\"\n\n\"\"\" c");
        let tokens: Vec<(TokenKind, usize, usize)> = Lexer::new(&source)
            .map(Result::unwrap)
            .filter(|t| !t.kind.is_ignored())
            .map(|t| (t.kind, t.line, t.column))
            .collect();
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Name, 1, 1),
                (TokenKind::String, 2, 3),
                (TokenKind::Name, 2, 8),
                (TokenKind::BlockString, 3, 1),
                (TokenKind::Name, 5, 5),
                (TokenKind::Eof, 5, 6),
            ]
        );
    }

    /// After the end, the lexer keeps answering end of input.
    #[test]
    fn eof_is_sticky() {
        let source = Source::new("a");
        let mut lexer = Lexer::new(&source);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Name);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }

    /// Grammatically incomplete documents still tokenize.
    #[test]
    fn accepts_unbalanced_documents() {
        assert_eq!(kinds("{ foo(").last(), Some(&TokenKind::Eof));
    }
}
