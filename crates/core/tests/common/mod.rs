#![allow(dead_code)]

use graphql_strip_ignored::{
    Source, SyntaxError, block_string::block_string_value, lexer::Lexer, token::TokenKind,
};

/// Significant tokens of `body` with their values: block strings by decoded value, everything
/// else by raw text. Two documents with equal streams parse to the same tree.
pub fn significant_tokens(body: &str) -> Result<Vec<(TokenKind, String)>, SyntaxError> {
    let source = Source::new(body);
    let mut tokens = Vec::new();
    for token in Lexer::new(&source) {
        let token = token?;
        if token.kind.is_ignored() || token.kind == TokenKind::Eof {
            continue;
        }
        let value = match token.block_body() {
            Some(raw) => block_string_value(raw),
            None => token.raw.to_string(),
        };
        tokens.push((token.kind, value));
    }
    Ok(tokens)
}

/// All tokens of an already-lexable `body`, ignored ones included, without `Eof`.
pub fn all_kinds(body: &str) -> Vec<TokenKind> {
    let source = Source::new(body);
    Lexer::new(&source)
        .map(|token| token.expect("lexable document").kind)
        .filter(|kind| *kind != TokenKind::Eof)
        .collect()
}
