#![no_main]

use graphql_strip_ignored::{
    Source, block_string::block_string_value, lexer::Lexer, strip_ignored_characters,
    token::TokenKind,
};
use libfuzzer_sys::fuzz_target;

/// Significant tokens with block strings compared by value.
fn significant(body: &str) -> Option<Vec<(TokenKind, String)>> {
    let source = Source::new(body);
    let mut tokens = Vec::new();
    for token in Lexer::new(&source) {
        let token = token.ok()?;
        if token.kind.is_ignored() || token.kind == TokenKind::Eof {
            continue;
        }
        let value = match token.block_body() {
            Some(raw) => block_string_value(raw),
            None => token.raw.to_string(),
        };
        tokens.push((token.kind, value));
    }
    Some(tokens)
}

fuzz_target!(|data: &[u8]| {
    // Limit input size to keep the fuzzer fast and avoid OOM in pathological cases.
    let data = if data.len() > 256 * 1024 {
        &data[..256 * 1024]
    } else {
        data
    };

    let body = String::from_utf8_lossy(data);

    // Syntax errors are expected outcomes and must never crash.
    let Ok(stripped) = strip_ignored_characters(&*body) else {
        return;
    };

    let again = strip_ignored_characters(stripped.as_str()).expect("stripped output must lex");
    assert_eq!(again, stripped, "stripping must be idempotent");
    assert_eq!(
        significant(&stripped),
        significant(&body),
        "stripping must not change significant tokens"
    );
});
