mod common;

use graphql_strip_ignored::{
    Source,
    block_string::{block_string_value, minimize_block_string},
    lexer::Lexer,
    strip_ignored_characters,
    token::TokenKind,
};
use proptest::prelude::*;

use common::{all_kinds, significant_tokens};

const TOKENS: &[&str] = &[
    "query", "a", "_b1", "on", "0", "12", "-3", "4.5", "6e7", "-0.1E-2", "\"\"", "\"s t\"",
    "\",#\"", "\"\\u00e9\\n\"", "\"\"\"\"\"\"", "\"\"\" x \"\"\"", "\"\"\"\n  y\n    z\n\"\"\"",
    "\"\"\"q\"\n\"\"\"", "!", "$", "&", "(", ")", "...", ":", "=", "@", "[", "]", "{", "|", "}",
];

const SEPARATORS: &[&str] = &[
    "", " ", "  ", "\t", "\n", "\r\n", "\r", ",", ", ", "\u{feff}", "# c\n", "\n\n  ",
];

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (
            prop::sample::select(SEPARATORS),
            prop::sample::select(TOKENS),
        ),
        0..32,
    )
    .prop_flat_map(|parts| {
        prop::sample::select(SEPARATORS).prop_map(move |tail| {
            let mut doc: String = parts
                .iter()
                .flat_map(|(separator, token)| [*separator, *token])
                .collect();
            doc.push_str(tail);
            doc
        })
    })
}

proptest! {
    #[test]
    fn strip_is_idempotent(doc in document()) {
        prop_assume!(significant_tokens(&doc).is_ok());
        let once = strip_ignored_characters(doc.as_str()).unwrap();
        let twice = strip_ignored_characters(once.as_str()).unwrap();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn strip_preserves_significant_tokens(doc in document()) {
        let Ok(expected) = significant_tokens(&doc) else {
            prop_assert!(strip_ignored_characters(doc.as_str()).is_err());
            return Ok(());
        };
        let stripped = strip_ignored_characters(doc.as_str()).unwrap();
        prop_assert!(stripped.len() <= doc.len());
        prop_assert_eq!(significant_tokens(&stripped).unwrap(), expected);
    }

    #[test]
    fn strip_leaves_only_single_spaces(doc in document()) {
        prop_assume!(significant_tokens(&doc).is_ok());
        let stripped = strip_ignored_characters(doc.as_str()).unwrap();
        let kinds = all_kinds(&stripped);

        prop_assert!(kinds.first().is_none_or(|kind| !kind.is_ignored()));
        prop_assert!(kinds.last().is_none_or(|kind| !kind.is_ignored()));
        for pair in kinds.windows(2) {
            prop_assert!(!(pair[0].is_ignored() && pair[1].is_ignored()));
        }

        // The only ignored tokens left are the separators themselves.
        let source = Source::new(stripped.as_str());
        for token in Lexer::new(&source) {
            let token = token.unwrap();
            if token.kind.is_ignored() {
                prop_assert_eq!(token.kind, TokenKind::Whitespace);
                prop_assert_eq!(token.raw, " ");
            }
        }
    }

    #[test]
    fn minimized_block_strings_keep_their_value(raw in "[\n\r\t \"a\\\\]{0,16}") {
        let doc = format!("\"\"\"{raw}\"\"\"");
        prop_assume!(all_lexes_as_one_block_string(&doc));

        let minimized = minimize_block_string(&raw);
        prop_assert_eq!(block_string_value(&minimized), block_string_value(&raw));

        let stripped = strip_ignored_characters(doc.as_str()).unwrap();
        prop_assert_eq!(&stripped, &format!("\"\"\"{minimized}\"\"\""));
        prop_assert!(all_lexes_as_one_block_string(&stripped));
    }
}

fn all_lexes_as_one_block_string(doc: &str) -> bool {
    let source = Source::new(doc);
    let kinds: Result<Vec<TokenKind>, _> = Lexer::new(&source)
        .map(|token| token.map(|token| token.kind))
        .collect();
    matches!(kinds.as_deref(), Ok([TokenKind::BlockString, TokenKind::Eof]))
}

/// Every block string body over a small alphabet up to five characters strips to a body with
/// the same value.
#[test]
fn block_strings_exhaustively() {
    const ALPHABET: [char; 7] = ['\n', '\r', '\t', ' ', '"', 'a', '\\'];
    const MAX_LEN: u32 = 5;

    let mut checked = 0usize;
    for len in 0..=MAX_LEN {
        for mut n in 0..ALPHABET.len().pow(len) {
            let mut raw = String::with_capacity(len as usize);
            for _ in 0..len {
                raw.push(ALPHABET[n % ALPHABET.len()]);
                n /= ALPHABET.len();
            }

            let doc = format!("\"\"\"{raw}\"\"\"");
            if !all_lexes_as_one_block_string(&doc) {
                continue;
            }
            checked += 1;

            let stripped = strip_ignored_characters(doc.as_str()).unwrap();
            assert!(
                all_lexes_as_one_block_string(&stripped),
                "{raw:?} stripped to {stripped:?}"
            );
            let stripped_raw = &stripped[3..stripped.len() - 3];
            assert_eq!(
                block_string_value(stripped_raw),
                block_string_value(&raw),
                "{raw:?} stripped to {stripped:?}"
            );
            assert_eq!(
                strip_ignored_characters(stripped.as_str()).unwrap(),
                stripped,
                "{raw:?} is not a fixed point"
            );
        }
    }
    assert!(checked > 10_000, "only {checked} bodies were lexable");
}
