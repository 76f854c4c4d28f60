#![no_main]

use graphql_strip_ignored::{
    Source, strip_ignored_characters_rewrite_sourcemap, strip_ignored_characters_with_sourcemap,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 256 * 1024 {
        &data[..256 * 1024]
    } else {
        data
    };

    let body = String::from_utf8_lossy(data);
    let source = Source::new(&*body).with_name("fuzz.graphql");

    // Create a sourcemap, then try rewriting it.
    // Syntax errors are expected outcomes and should be reported as Err, not crashes.
    if let Ok(created) = strip_ignored_characters_with_sourcemap(&source) {
        // Stripping the output again with the created map must keep mappings valid.
        let rewritten =
            strip_ignored_characters_rewrite_sourcemap(created.code.as_str(), &created.sourcemap)
                .expect("rewriting a created sourcemap must succeed");
        assert_eq!(rewritten.code, created.code);

        // Also try a corrupted map to exercise rewrite error handling.
        // (Rewrite should return Err, but must never crash.)
        let half = &created.sourcemap.as_bytes()[..created.sourcemap.len() / 2];
        let corrupted = String::from_utf8_lossy(half);
        let _ = strip_ignored_characters_rewrite_sourcemap(&source, &corrupted);
    }
});
