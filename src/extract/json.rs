//! Bounded search through parsed JSON payloads.
//!
//! Embedded page data (`__NEXT_DATA__`, app state blobs) nests the track we
//! want at an unpredictable depth. [`find_object`] visits every object
//! depth-first, pre-order, and stops at the first one the visitor accepts.
//! Recursion is capped at [`MAX_DEPTH`] so a pathological payload costs a
//! bounded amount of work.

use serde_json::{Map, Value};

/// Maximum nesting depth visited.
pub const MAX_DEPTH: usize = 64;

/// Depth-first search for the first object `visit` maps to `Some`.
pub fn find_object<'a, T>(
    value: &'a Value,
    visit: &mut impl FnMut(&'a Map<String, Value>) -> Option<T>,
) -> Option<T> {
    walk(value, visit, 0)
}

fn walk<'a, T>(
    value: &'a Value,
    visit: &mut impl FnMut(&'a Map<String, Value>) -> Option<T>,
    depth: usize,
) -> Option<T> {
    if depth > MAX_DEPTH {
        return None;
    }
    match value {
        Value::Object(map) => {
            if let Some(found) = visit(map) {
                return Some(found);
            }
            map.values().find_map(|v| walk(v, visit, depth + 1))
        }
        Value::Array(items) => items.iter().find_map(|v| walk(v, visit, depth + 1)),
        _ => None,
    }
}

/// Non-empty string field of an object.
pub fn str_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
