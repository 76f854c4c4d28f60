//! Token model shared by the lexer and the stripper.

use std::fmt;

/// Every lexical token kind of the query language.
///
/// The set is closed and partitioned by [`TokenKind::class`]; the stripper decides spacing
/// from the class alone (plus the spread special case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Ignored.
    Bom,
    Whitespace,
    LineTerminator,
    Comment,
    Comma,

    // Punctuators.
    Bang,
    Dollar,
    Amp,
    ParenL,
    ParenR,
    Spread,
    Colon,
    Equals,
    At,
    BracketL,
    BracketR,
    BraceL,
    Pipe,
    BraceR,

    // Word-like values.
    Name,
    Int,
    Float,
    String,
    BlockString,

    Eof,
}

/// Coarse partition of [`TokenKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// Never printed: BOM, whitespace, line terminators, comments, commas.
    Ignored,
    /// Self-delimiting symbols.
    Punctuator,
    /// Names, numbers and strings; two of them written back to back would re-lex differently.
    NonPunctuator,
    /// End of input.
    Terminator,
}

impl TokenKind {
    pub fn class(self) -> TokenClass {
        use TokenKind::*;
        match self {
            Bom | Whitespace | LineTerminator | Comment | Comma => TokenClass::Ignored,
            Bang | Dollar | Amp | ParenL | ParenR | Spread | Colon | Equals | At | BracketL
            | BracketR | BraceL | Pipe | BraceR => TokenClass::Punctuator,
            Name | Int | Float | String | BlockString => TokenClass::NonPunctuator,
            Eof => TokenClass::Terminator,
        }
    }

    pub fn is_ignored(self) -> bool {
        self.class() == TokenClass::Ignored
    }

    pub fn is_punctuator(self) -> bool {
        self.class() == TokenClass::Punctuator
    }

    pub fn is_non_punctuator(self) -> bool {
        self.class() == TokenClass::NonPunctuator
    }

    /// Human-readable description, matching how the language's tooling names kinds.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            Bom => "<BOM>",
            Whitespace => "<Whitespace>",
            LineTerminator => "<LineTerminator>",
            Comment => "Comment",
            Comma => ",",
            Bang => "!",
            Dollar => "$",
            Amp => "&",
            ParenL => "(",
            ParenR => ")",
            Spread => "...",
            Colon => ":",
            Equals => "=",
            At => "@",
            BracketL => "[",
            BracketR => "]",
            BraceL => "{",
            Pipe => "|",
            BraceR => "}",
            Name => "Name",
            Int => "Int",
            Float => "Float",
            String => "String",
            BlockString => "BlockString",
            Eof => "<EOF>",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// One token, borrowing its text from the source body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Exact source slice, delimiters included. Empty for [`TokenKind::Eof`].
    pub raw: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// 1-based line of the first character.
    pub line: usize,
    /// 1-based column of the first character, in UTF-16 code units.
    pub column: usize,
}

impl<'a> Token<'a> {
    /// Byte offset one past the last character.
    pub fn end(&self) -> usize {
        self.start + self.raw.len()
    }

    /// Text between the triple quotes of a block string, unprocessed.
    pub fn block_body(&self) -> Option<&'a str> {
        if self.kind != TokenKind::BlockString {
            return None;
        }
        self.raw.get(3..self.raw.len().saturating_sub(3))
    }
}
