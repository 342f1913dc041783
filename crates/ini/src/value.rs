//! Conversion between nested dictionaries and two-level INI documents.
//!
//! Top-level objects become sections, deeper objects become dotted keys inside their section,
//! and top-level scalars land in [`DEFAULT_SECTION`]. Arrays are written as JSON text, nulls
//! are omitted.

use crate::document::{DEFAULT_SECTION, IniDocument};
use crate::error::IniError;
use serde_json::{Map, Number, Value};

const KEY_SEPARATOR: char = '.';

/// Flattens a nested dictionary into a document.
///
/// # Errors
/// Returns [`IniError::Structure`] if `value` is not an object.
pub fn from_value(value: &Value) -> Result<IniDocument, IniError> {
    let Value::Object(root) = value else {
        return Err(IniError::structure("only dictionaries can be written as INI"));
    };

    let mut document = IniDocument::new();
    for (name, child) in root {
        match child {
            Value::Object(section) => {
                document.add_section(name.clone());
                for (key, nested) in section {
                    write_entry(&mut document, name, key.clone(), nested);
                }
            },
            scalar => write_entry(&mut document, DEFAULT_SECTION, name.clone(), scalar),
        }
    }

    Ok(document)
}

fn write_entry(document: &mut IniDocument, section: &str, key: String, value: &Value) {
    match value {
        Value::Null => {},
        Value::Object(map) => {
            for (child, nested) in map {
                write_entry(document, section, format!("{key}{KEY_SEPARATOR}{child}"), nested);
            }
        },
        Value::String(text) => {
            document.set(section, key, text.clone());
        },
        other => {
            document.set(section, key, other.to_string());
        },
    }
}

/// Inflates a document into a nested dictionary, inferring booleans, numbers and JSON arrays.
///
/// Keys of [`DEFAULT_SECTION`] become top-level entries. When a plain key and a dotted key
/// collide, the nested object wins.
#[must_use]
pub fn to_value(document: &IniDocument) -> Value {
    let mut root = Map::new();

    for (name, section) in document.iter() {
        let target = if name == DEFAULT_SECTION {
            &mut root
        } else {
            object_at(&mut root, name)
        };
        for (key, raw) in section {
            insert_dotted(target, key, infer(raw));
        }
    }

    Value::Object(root)
}

fn object_at<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let slot = map.entry(key.to_owned()).or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(inner) => inner,
        _ => unreachable!("slot was just made an object"),
    }
}

fn insert_dotted(map: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once(KEY_SEPARATOR) {
        Some((head, rest)) => insert_dotted(object_at(map, head), rest, value),
        None => {
            if !map.get(key).is_some_and(Value::is_object) {
                map.insert(key.to_owned(), value);
            }
        },
    }
}

/// Interprets an INI string the way a reader of typed configuration would.
fn infer(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {},
    }

    if let Ok(int) = raw.parse::<i64>()
        && int.to_string() == raw
    {
        return Value::Number(int.into());
    }

    if raw.contains(['.', 'e', 'E'])
        && raw.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+'))
        && let Some(number) = raw.parse::<f64>().ok().and_then(Number::from_f64)
    {
        return Value::Number(number);
    }

    if raw.starts_with('[')
        && let Ok(array @ Value::Array(_)) = serde_json::from_str::<Value>(raw)
    {
        return array;
    }

    Value::String(raw.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_dictionaries_flatten_into_sections() {
        let document = from_value(&json!({
            "name": "svc",
            "debug": false,
            "http": { "timeout": { "connect": 5.0, "read": 30 }, "agent": "bedrock" },
            "optional": null,
        }))
        .unwrap();

        assert_eq!(document.get(DEFAULT_SECTION, "name"), Some("svc"));
        assert_eq!(document.get(DEFAULT_SECTION, "debug"), Some("false"));
        assert_eq!(document.get("http", "timeout.connect"), Some("5.0"));
        assert_eq!(document.get("http", "timeout.read"), Some("30"));
        assert_eq!(document.get("http", "agent"), Some("bedrock"));
        assert_eq!(document.get(DEFAULT_SECTION, "optional"), None);
    }

    #[test]
    fn inflation_infers_types_and_nests_dotted_keys() {
        let document: IniDocument = [
            (DEFAULT_SECTION, "name", "svc"),
            ("http", "timeout.connect", "5.5"),
            ("http", "retries", "3"),
            ("http", "verify", "true"),
            ("http", "codes", "[502, 503]"),
            ("http", "zip", "007"),
            ("http", "version", "1.1.0"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            to_value(&document),
            json!({
                "name": "svc",
                "http": {
                    "timeout": { "connect": 5.5 },
                    "retries": 3,
                    "verify": true,
                    "codes": [502, 503],
                    "zip": "007",
                    "version": "1.1.0",
                },
            })
        );
    }

    #[test]
    fn non_objects_cannot_be_flattened() {
        assert!(from_value(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn empty_objects_keep_their_section() {
        let document = from_value(&json!({ "empty": {} })).unwrap();
        assert!(document.contains_section("empty"));
        assert_eq!(to_value(&document), json!({ "empty": {} }));
    }
}
