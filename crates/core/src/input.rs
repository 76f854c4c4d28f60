//! Resolving loosely-typed input into a [`Source`].
//!
//! Bindings (the WASM crate, JSON-driven tools) receive whatever value the host passed. This
//! module accepts a string or a source-shaped object and rejects anything else with
//! [`StripError::InvalidInput`], quoting the received value the way the host language would
//! print it.
//!
//! `None` stands for an absent value (`undefined` in JavaScript).

use serde_json::{Map, Value};

use crate::{
    StripError,
    source::{LocationOffset, Source},
};

/// Longest array rendered in full by [`inspect`].
const MAX_ARRAY_LENGTH: usize = 10;
/// Nesting depth beyond which [`inspect`] prints a placeholder.
const MAX_RECURSIVE_DEPTH: usize = 2;

/// Build a source from a dynamic value.
///
/// Accepted shapes: a string body, or an object with a string `body`, an optional string
/// `name`, and an optional `locationOffset` of the form `{ "line": n, "column": n }`.
pub fn source_from_value(value: Option<&Value>) -> Result<Source<'_>, StripError> {
    let invalid = || StripError::InvalidInput {
        received: inspect(value),
    };

    match value {
        Some(Value::String(body)) => Ok(Source::new(body.as_str())),
        Some(Value::Object(object)) => {
            let Some(Value::String(body)) = object.get("body") else {
                return Err(invalid());
            };
            let mut source = Source::new(body.as_str());
            match object.get("name") {
                None | Some(Value::Null) => {}
                Some(Value::String(name)) => source = source.with_name(name.as_str()),
                Some(_) => return Err(invalid()),
            }
            match object.get("locationOffset") {
                None | Some(Value::Null) => {}
                Some(Value::Object(offset)) => {
                    let line = positive_field(offset, "line").ok_or_else(invalid)?;
                    let column = positive_field(offset, "column").ok_or_else(invalid)?;
                    source = source.with_location_offset(LocationOffset::new(line, column)?);
                }
                Some(_) => return Err(invalid()),
            }
            Ok(source)
        }
        _ => Err(invalid()),
    }
}

fn positive_field(object: &Map<String, Value>, key: &str) -> Option<usize> {
    match object.get(key) {
        None => Some(1),
        // Out-of-range numbers are left for `LocationOffset::new` to reject.
        Some(value) => value
            .as_u64()
            .map(|n| usize::try_from(n).unwrap_or(usize::MAX)),
    }
}

/// Render a value for diagnostics: `undefined`, `null`, `"text"`, `[1, 2]`, `{ a: 1 }`, `{}`.
pub fn inspect(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(value) => format_value(value, 0),
    }
}

fn format_value(value: &Value, depth: usize) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => Value::String(s.clone()).to_string(),
        Value::Array(items) => format_array(items, depth + 1),
        Value::Object(object) => format_object(object, depth + 1),
    }
}

fn format_array(items: &[Value], depth: usize) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }
    if depth > MAX_RECURSIVE_DEPTH {
        return "[Array]".to_string();
    }
    let shown = items.len().min(MAX_ARRAY_LENGTH);
    let mut parts: Vec<String> = items[..shown]
        .iter()
        .map(|item| format_value(item, depth))
        .collect();
    match items.len() - shown {
        0 => {}
        1 => parts.push("... 1 more item".to_string()),
        remaining => parts.push(format!("... {remaining} more items")),
    }
    format!("[{}]", parts.join(", "))
}

fn format_object(object: &Map<String, Value>, depth: usize) -> String {
    if object.is_empty() {
        return "{}".to_string();
    }
    if depth > MAX_RECURSIVE_DEPTH {
        return "[Object]".to_string();
    }
    let properties: Vec<String> = object
        .iter()
        .map(|(key, value)| format!("{key}: {}", format_value(value, depth)))
        .collect();
    format!("{{ {} }}", properties.join(", "))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::source::MAX_LOCATION_OFFSET;

    fn invalid_message(value: Option<&Value>) -> String {
        source_from_value(value).unwrap_err().to_string()
    }

    /// Strings become sources with the default name.
    #[test]
    fn accepts_string() {
        let value = json!("{ a }");
        let source = source_from_value(Some(&value)).unwrap();
        assert_eq!(source.body(), "{ a }");
        assert_eq!(source.name(), crate::source::DEFAULT_SOURCE_NAME);
    }

    /// Source-shaped objects keep their name and offset.
    #[test]
    fn accepts_source_object() {
        let value = json!({
            "body": "{ a }",
            "name": "query.graphql",
            "locationOffset": { "line": 2, "column": 5 },
        });
        let source = source_from_value(Some(&value)).unwrap();
        assert_eq!(source.body(), "{ a }");
        assert_eq!(source.name(), "query.graphql");
        assert_eq!(
            source.location_offset(),
            LocationOffset::new(2, 5).unwrap()
        );
    }

    /// Missing and non-source values are rejected with the received value rendered.
    #[test]
    fn rejects_other_values() {
        assert_eq!(
            invalid_message(None),
            "Must provide string or Source. Received: undefined"
        );
        assert_eq!(
            invalid_message(Some(&json!({}))),
            "Must provide string or Source. Received: {}"
        );
        assert_eq!(
            invalid_message(Some(&json!(null))),
            "Must provide string or Source. Received: null"
        );
        assert_eq!(
            invalid_message(Some(&json!({ "body": 1 }))),
            "Must provide string or Source. Received: { body: 1 }"
        );
    }

    /// A zero offset component is rejected.
    #[test]
    fn rejects_zero_offset() {
        let value = json!({ "body": "", "locationOffset": { "line": 0, "column": 1 } });
        assert!(matches!(
            source_from_value(Some(&value)),
            Err(StripError::InvalidLocationOffset { line: 0, column: 1 })
        ));
    }

    /// Oversized offsets are rejected up front, so a later syntax error renders normally.
    #[test]
    fn rejects_oversized_offset() {
        let value = json!({
            "body": "{ ?",
            "locationOffset": { "line": 1, "column": u64::MAX },
        });
        let err = source_from_value(Some(&value)).unwrap_err();
        assert!(matches!(
            err,
            StripError::InvalidLocationOffset { line: 1, .. }
        ));

        let value = json!({
            "body": "{ ?",
            "locationOffset": { "line": MAX_LOCATION_OFFSET, "column": MAX_LOCATION_OFFSET },
        });
        let source = source_from_value(Some(&value)).unwrap();
        let err = crate::strip_ignored_characters(&source).unwrap_err();
        let StripError::Syntax(err) = err else {
            panic!("expected a syntax error, got {err:?}");
        };
        assert_eq!(err.description(), "Unexpected character: \"?\".");
    }

    /// Rendering follows the host language's inspection format.
    #[test]
    fn inspects_values() {
        assert_eq!(inspect(Some(&json!(true))), "true");
        assert_eq!(inspect(Some(&json!(1.5))), "1.5");
        assert_eq!(inspect(Some(&json!("a\"b"))), "\"a\\\"b\"");
        assert_eq!(inspect(Some(&json!([]))), "[]");
        assert_eq!(inspect(Some(&json!([1, "x", null]))), "[1, \"x\", null]");
        assert_eq!(
            inspect(Some(&json!({ "a": { "b": { "c": {} , "d": 1 } } }))),
            "{ a: { b: [Object] } }"
        );
        assert_eq!(inspect(Some(&json!([[[1]]]))), "[[[Array]]]");
        assert_eq!(
            inspect(Some(&json!((0..12).collect::<Vec<_>>()))),
            "[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, ... 2 more items]"
        );
        assert_eq!(
            inspect(Some(&json!((0..11).collect::<Vec<_>>()))),
            "[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, ... 1 more item]"
        );
    }
}
