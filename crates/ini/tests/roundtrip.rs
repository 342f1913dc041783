use bedrock_ini::{IniDocument, dumps, from_value, parse, to_value};
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeMap;

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.-]{0,11}"
}

fn value() -> impl Strategy<Value = String> {
    "([A-Za-z0-9/_.,+;#'\"=:-]([A-Za-z0-9 /_.,+;#'\"=:-]{0,20}[A-Za-z0-9/_.,+;#'\"=:-])?)?"
}

fn document() -> impl Strategy<Value = BTreeMap<String, BTreeMap<String, String>>> {
    proptest::collection::btree_map(
        name(),
        proptest::collection::btree_map(name(), value(), 0..6),
        0..5,
    )
}

proptest! {
    #[test]
    fn flat_documents_survive_dumps_then_parse(sections in document()) {
        let document = IniDocument::from(sections);
        let text = dumps(&document).unwrap();
        prop_assert_eq!(parse(&text).unwrap(), document);
    }

    #[test]
    fn padded_values_are_rejected(value in value(), left in "[ \t]{0,2}", right in "[ \t]{0,2}") {
        prop_assume!(!left.is_empty() || !right.is_empty());
        let document: IniDocument = [("s", "k", format!("{left}{value}{right}"))].into_iter().collect();

        let err = dumps(&document).unwrap_err();
        prop_assert_eq!(err.code(), "INI_STRUCTURE");
    }

    #[test]
    fn dumps_is_stable_after_reparse(sections in document()) {
        let document = IniDocument::from(sections);
        let text = dumps(&document).unwrap();
        let reparsed = parse(&text).unwrap();
        prop_assert_eq!(dumps(&reparsed).unwrap(), text);
    }
}

#[test]
fn typed_dictionaries_round_trip_through_text() {
    let original = json!({
        "name": "gateway",
        "http": {
            "timeout": { "connect": 2.5, "read": 30 },
            "verify_tls": true,
            "status_forcelist": [502, 503, 504],
        },
        "pool": { "max_connections": 100 },
    });

    let text = dumps(&from_value(&original).unwrap()).unwrap();
    assert_eq!(to_value(&parse(&text).unwrap()), original);
}
