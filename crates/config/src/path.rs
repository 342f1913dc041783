//! Dotted-path helpers over `serde_json` object trees.
//!
//! A *leaf* is any value that is not a non-empty object. Empty objects are leaves so that
//! map-typed fields without entries are still addressable.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub(crate) const SEPARATOR: char = '.';

/// Flattens `value` into `path -> leaf` pairs.
pub(crate) fn flatten(value: &Value) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    flatten_into(value, None, &mut out);
    out
}

fn flatten_into(value: &Value, prefix: Option<&str>, out: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let path = prefix.map_or_else(|| key.clone(), |p| format!("{p}{SEPARATOR}{key}"));
                flatten_into(child, Some(&path), out);
            }
        },
        leaf => {
            if let Some(path) = prefix {
                out.insert(path.to_owned(), leaf.clone());
            }
        },
    }
}

pub(crate) fn get<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split(SEPARATOR).try_fold(value, |node, key| node.as_object()?.get(key))
}

/// Builds `{"a": {"b": value}}` from `a.b`.
pub(crate) fn nest(path: &str, value: Value) -> Value {
    path.rsplit(SEPARATOR).fold(value, |acc, key| {
        let mut map = Map::new();
        map.insert(key.to_owned(), acc);
        Value::Object(map)
    })
}

/// Replaces the value at `path`, creating intermediate objects as needed.
pub(crate) fn set(target: &mut Value, path: &str, value: Value) {
    merge(target, nest(path, value));
}

/// Removes the value at `path`. Returns `true` if something was removed.
pub(crate) fn remove(target: &mut Value, path: &str) -> bool {
    let (parent, key) = match path.rsplit_once(SEPARATOR) {
        Some((parent, key)) => (get_mut(target, parent), key),
        None => (Some(target), path),
    };
    parent.and_then(Value::as_object_mut).is_some_and(|map| map.remove(key).is_some())
}

fn get_mut<'a>(value: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    path.split(SEPARATOR).try_fold(value, |node, key| node.as_object_mut()?.get_mut(key))
}

/// Deep-merges `incoming` into `target`. Objects merge key by key, everything else replaces.
pub(crate) fn merge(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                if let Some(slot) =
                    existing.get_mut(&key).filter(|slot| slot.is_object() && value.is_object())
                {
                    merge(slot, value);
                } else {
                    existing.insert(key, value);
                }
            }
        },
        (slot, value) => *slot = value,
    }
}

/// Rewrites dotted object keys (`{"a.b": 1}`) into nested objects (`{"a": {"b": 1}}`),
/// recursively. Later keys win where both spellings name the same leaf.
pub(crate) fn expand(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Value::Object(Map::new());
            for (key, child) in map {
                let child = expand(child);
                if key.contains(SEPARATOR) {
                    merge(&mut out, nest(&key, child));
                } else {
                    merge(&mut out, Value::Object(Map::from_iter([(key, child)])));
                }
            }
            out
        },
        other => other,
    }
}

/// Lowercases every object key, recursively.
pub(crate) fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter().map(|(k, v)| (k.to_lowercase(), lowercase_keys(v))).collect(),
        ),
        other => other,
    }
}

/// `true` if `path` equals `prefix` or lies underneath it.
pub(crate) fn is_within(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix).is_some_and(|rest| rest.is_empty() || rest.starts_with(SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flatten_keeps_arrays_and_empty_objects_as_leaves() {
        let value = json!({ "a": { "b": 1, "c": [1, 2] }, "d": {}, "e": null });
        let flat = flatten(&value);

        assert_eq!(flat.len(), 4);
        assert_eq!(flat["a.b"], json!(1));
        assert_eq!(flat["a.c"], json!([1, 2]));
        assert_eq!(flat["d"], json!({}));
        assert_eq!(flat["e"], Value::Null);
    }

    #[test]
    fn set_get_remove() {
        let mut value = json!({ "a": { "b": 1 } });
        set(&mut value, "a.c.d", json!("x"));

        assert_eq!(get(&value, "a.c.d"), Some(&json!("x")));
        assert_eq!(get(&value, "a.b"), Some(&json!(1)));
        assert!(remove(&mut value, "a.c"));
        assert!(get(&value, "a.c").is_none());
        assert!(!remove(&mut value, "missing.key"));
    }

    #[test]
    fn merge_replaces_non_objects() {
        let mut value = json!({ "list": [1, 2, 3], "nested": { "keep": true, "swap": 1 } });
        merge(&mut value, json!({ "list": [9], "nested": { "swap": 2 } }));

        assert_eq!(value, json!({ "list": [9], "nested": { "keep": true, "swap": 2 } }));
    }

    #[test]
    fn dotted_keys_expand_into_nested_objects() {
        let value = expand(json!({ "a.b": 1, "a": { "c": 2 }, "d": { "e.f": true }, "g": [1] }));

        assert_eq!(value, json!({ "a": { "b": 1, "c": 2 }, "d": { "e": { "f": true } }, "g": [1] }));
        assert_eq!(expand(json!(5)), json!(5));
    }

    #[test]
    fn prefix_matching_respects_segments() {
        assert!(is_within("http.pool.size", "http.pool"));
        assert!(is_within("http.pool", "http.pool"));
        assert!(!is_within("http.pooling", "http.pool"));
    }
}
