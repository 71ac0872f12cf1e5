//! Lenient lookups into untyped JSON responses.

use serde_json::Value;

/// Follow `path` through nested objects.
///
/// Returns `None` at the first segment that is missing or whose parent is not
/// an object.
pub fn lookup_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |node, segment| node.as_object()?.get(*segment))
}

/// Whether a value counts as absent under Elance's loose field semantics.
///
/// `null`, `false`, numeric zero, `""`, `"0"`, `[]` and `{}` are all treated
/// the same as a missing field.
pub fn is_empty_like(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Render a scalar leaf as a string. Numeric ids are common upstream.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Look up `path` and return the leaf as a string, or `None` when the leaf is
/// missing, empty-like, or not a scalar.
pub fn string_at(value: &Value, path: &[&str]) -> Option<String> {
    lookup_path(value, path)
        .filter(|leaf| !is_empty_like(leaf))
        .and_then(scalar_to_string)
}
