use bedrock_cli::{
    ClassifiedParam, ClassifyPolicy, ParamHint, ParamSpec, ParamType, build_command, classify,
    extract,
};
use bedrock_config::{ConfigModel, ConfigSource, Tracked};
use serde::{Deserialize, Serialize};
use serde_json::json;

fn params() -> Vec<ClassifiedParam> {
    classify(
        &[
            ParamSpec::new("input", ParamType::Path).with_help("File to read"),
            ParamSpec::new("output", ParamType::Path).with_default("out.json"),
            ParamSpec::new("max_items", ParamType::Integer).with_default(10),
            ParamSpec::new("ratio", ParamType::Float).with_default(0.5),
            ParamSpec::new("verbose", ParamType::Bool).with_default(false),
            ParamSpec::new("color", ParamType::Bool).with_default(true),
            ParamSpec::new("tag", ParamType::List).with_hint(ParamHint::Option),
        ],
        ClassifyPolicy::default(),
    )
    .expect("classify")
}

#[test]
fn built_commands_pass_clap_assertions() {
    build_command("tool", &params()).debug_assert();
}

#[test]
fn only_command_line_values_are_extracted() {
    let params = params();
    let matches = build_command("tool", &params)
        .try_get_matches_from(["tool", "in.ini", "--max-items", "25", "--verbose"])
        .expect("parse");

    let values = extract(&matches, &params).expect("extract");
    assert_eq!(
        serde_json::Value::Object(values),
        json!({ "input": "in.ini", "max_items": 25, "verbose": true })
    );
}

#[test]
fn every_type_is_converted() {
    let params = params();
    let matches = build_command("tool", &params)
        .try_get_matches_from([
            "tool", "in.ini", "--output", "result.json", "--ratio", "0.25", "--no-color", "--tag",
            "a", "--tag", "b",
        ])
        .expect("parse");

    let values = extract(&matches, &params).expect("extract");
    assert_eq!(values["output"], json!("result.json"));
    assert_eq!(values["ratio"], json!(0.25));
    assert_eq!(values["color"], json!(false));
    assert_eq!(values["tag"], json!(["a", "b"]));
}

#[test]
fn leading_defaulted_parameter_is_an_optional_positional() {
    let params = classify(
        &[
            ParamSpec::new("target", ParamType::String).with_default("all"),
            ParamSpec::new("jobs", ParamType::Integer).with_default(4),
        ],
        ClassifyPolicy::default(),
    )
    .expect("classify");
    let command = build_command("tool", &params);

    let given = command
        .clone()
        .try_get_matches_from(["tool", "docs", "--jobs", "2"])
        .expect("parse with target");
    assert_eq!(
        serde_json::Value::Object(extract(&given, &params).expect("extract")),
        json!({ "target": "docs", "jobs": 2 })
    );

    let omitted = command.try_get_matches_from(["tool"]).expect("parse without target");
    assert_eq!(omitted.get_one::<String>("target").map(String::as_str), Some("all"));
    assert!(extract(&omitted, &params).expect("extract").is_empty());
}

#[test]
fn clap_rejects_bad_input() {
    let params = params();
    let command = build_command("tool", &params);

    assert!(command.clone().try_get_matches_from(["tool"]).is_err());
    assert!(
        command
            .try_get_matches_from(["tool", "in.ini", "--max-items", "many"])
            .is_err()
    );
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Settings {
    name: String,
    limits: Limits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Limits {
    depth: i64,
}

impl Default for Limits {
    fn default() -> Self {
        Self { depth: 3 }
    }
}

impl ConfigModel for Settings {}

#[test]
fn extracted_values_merge_as_overrides() {
    let params = classify(
        &[
            ParamSpec::new("name", ParamType::String).with_default("anonymous"),
            ParamSpec::new("limits.depth", ParamType::Integer).with_default(3),
        ],
        ClassifyPolicy::options_only(),
    )
    .expect("classify");
    let matches = build_command("tool", &params)
        .try_get_matches_from(["tool", "--limits.depth", "9"])
        .expect("parse");

    let mut settings = Tracked::<Settings>::new().expect("defaults");
    let values = extract(&matches, &params).expect("extract");
    settings.merge(serde_json::Value::Object(values), ConfigSource::Override).expect("merge");

    assert_eq!(settings.limits.depth, 9);
    assert_eq!(settings.source_of("limits.depth"), Some(&ConfigSource::Override));
    assert_eq!(settings.source_of("name"), Some(&ConfigSource::Default));
}
