//! wasm-bindgen exports.
//!
//! This module exposes the ignored-character stripper to JavaScript via `wasm-bindgen`.
//! Inputs are taken as `any` and may be a string or a `Source`-shaped object
//! (`{ body, name?, locationOffset? }`). Anything else is rejected with
//! `Must provide string or Source. Received: ...`.

use graphql_strip_ignored::{
    StripError, input::source_from_value, strip_ignored_characters as strip,
    strip_ignored_characters_rewrite_sourcemap as strip_rewrite,
    strip_ignored_characters_with_sourcemap as strip_with_sourcemap,
};
use wasm_bindgen::{JsCast, prelude::*};

/// Output from the wasm API when a sourcemap is requested.
#[derive(Debug, Clone, serde::Serialize, tsify::Tsify)]
#[tsify(into_wasm_abi)]
pub struct StripOutput {
    /// The stripped document.
    pub code: String,
    /// The generated/re-written sourcemap JSON.
    pub sourcemap: String,
}

/// Strip ignored characters from a document or `Source`.
#[wasm_bindgen(js_name = stripIgnoredCharacters)]
pub fn strip_ignored_characters(input: JsValue) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let value = to_json(&input).map_err(to_js_error)?;
    let source = source_from_value(value.as_ref()).map_err(to_js_error)?;
    strip(&source).map_err(to_js_error)
}

/// Strip ignored characters and create a brand-new sourcemap.
///
/// The source's `name` is recorded as the sourcemap's source filename.
#[wasm_bindgen(js_name = stripIgnoredCharactersWithSourcemap)]
pub fn strip_ignored_characters_with_sourcemap(input: JsValue) -> Result<StripOutput, JsValue> {
    console_error_panic_hook::set_once();

    let value = to_json(&input).map_err(to_js_error)?;
    let source = source_from_value(value.as_ref()).map_err(to_js_error)?;
    let res = strip_with_sourcemap(&source).map_err(to_js_error)?;
    Ok(StripOutput {
        code: res.code,
        sourcemap: res.sourcemap,
    })
}

/// Strip ignored characters and rewrite the sourcemap of the input document.
#[wasm_bindgen(js_name = stripIgnoredCharactersRewriteSourcemap)]
pub fn strip_ignored_characters_rewrite_sourcemap(
    input: JsValue,
    input_sourcemap: String,
) -> Result<StripOutput, JsValue> {
    console_error_panic_hook::set_once();

    let value = to_json(&input).map_err(to_js_error)?;
    let source = source_from_value(value.as_ref()).map_err(to_js_error)?;
    let res = strip_rewrite(&source, &input_sourcemap).map_err(to_js_error)?;
    Ok(StripOutput {
        code: res.code,
        sourcemap: res.sourcemap,
    })
}

/// `undefined` becomes `None`; values with no JSON form are rejected as invalid input.
fn to_json(input: &JsValue) -> Result<Option<serde_json::Value>, StripError> {
    if input.is_undefined() {
        return Ok(None);
    }
    let invalid = || StripError::InvalidInput {
        received: inspect_js(input),
    };
    // Non-finite numbers would otherwise arrive as `null`.
    if input.as_f64().is_some_and(|n| !n.is_finite()) {
        return Err(invalid());
    }
    serde_wasm_bindgen::from_value(input.clone())
        .map(Some)
        .map_err(|_| invalid())
}

/// Render a value that has no JSON form.
fn inspect_js(input: &JsValue) -> String {
    let detail = if let Some(function) = input.dyn_ref::<js_sys::Function>() {
        function.name().as_string()
    } else if let Some(symbol) = input.dyn_ref::<js_sys::Symbol>() {
        symbol.to_string().as_string()
    } else if let Some(bigint) = input.dyn_ref::<js_sys::BigInt>() {
        bigint.to_string(10).ok().and_then(|s| s.as_string())
    } else {
        input.as_f64().map(format_number)
    };
    let type_of = input.js_typeof().as_string().unwrap_or_default();
    describe_opaque(&type_of, detail)
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_sign_negative() {
        "-Infinity".to_string()
    } else {
        "Infinity".to_string()
    }
}

fn describe_opaque(type_of: &str, detail: Option<String>) -> String {
    match (type_of, detail) {
        ("function", Some(name)) if !name.is_empty() => format!("[function {name}]"),
        ("function", _) => "[function]".to_string(),
        (_, Some(detail)) => detail,
        (type_of, None) => format!("[{type_of}]"),
    }
}

fn to_js_error(err: StripError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}
