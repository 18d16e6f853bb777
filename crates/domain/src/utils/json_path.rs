//! Dotted-path value lookup in JSON documents
//!
//! Paths use `.` as separator. Object segments are literal keys; a numeric
//! segment indexes into an array (`items.0.id`). An empty path returns the
//! document itself.

use serde_json::Value;

/// Look up the value at `path`, or `None` when any segment is absent.
pub fn lookup<'a>(json: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(json);
    }

    path.split('.').try_fold(json, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    })
}

/// Look up a string at `path`.
pub fn lookup_str<'a>(json: &'a Value, path: &str) -> Option<&'a str> {
    lookup(json, path).and_then(Value::as_str)
}

/// Render a scalar for comparison against status vocabularies.
///
/// Strings are returned as-is, numbers and booleans in their JSON form,
/// and `null`/containers yield `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
