#![no_main]

use graphql_strip_ignored::{Source, strip_ignored_characters_with_sourcemap};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 256 * 1024 {
        &data[..256 * 1024]
    } else {
        data
    };

    let body = String::from_utf8_lossy(data);
    let source = Source::new(&*body).with_name("input.graphql");

    if let Ok(out) = strip_ignored_characters_with_sourcemap(&source) {
        // If creation succeeds, the sourcemap must be parseable JSON.
        // Any panic here is a bug we want the fuzzer to catch.
        let map = serde_json::from_str::<serde_json::Value>(&out.sourcemap)
            .expect("sourcemap must be valid JSON when stripping returns Ok");
        assert_eq!(map["version"], 3);
    }
});
