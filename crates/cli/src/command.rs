use crate::param::{ClassifiedParam, ParamKind, ParamSpec, ParamType};
use bedrock_errors::FoundationError;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Builds a `clap` command exposing `params` as classified.
///
/// Defaults are shown in `--help` but [`extract`] only reports values given on the
/// command line. A flag whose default is `true` is exposed as `--no-<name>`.
#[must_use]
pub fn build_command(name: impl Into<String>, params: &[ClassifiedParam]) -> Command {
    let mut index = 0;
    params.iter().fold(Command::new(name.into()), |command, param| {
        let arg = match param.kind {
            ParamKind::Argument { required } => {
                index += 1;
                positional(&param.spec, index, required)
            },
            ParamKind::Option => option(&param.spec),
            ParamKind::Flag => flag(&param.spec),
        };
        command.arg(arg)
    })
}

fn base(spec: &ParamSpec) -> Arg {
    let arg = Arg::new(spec.name().to_owned());
    match spec.help() {
        Some(help) => arg.help(help.to_owned()),
        None => arg,
    }
}

fn typed(arg: Arg, ty: ParamType) -> Arg {
    match ty {
        ParamType::Bool => arg.value_parser(value_parser!(bool)),
        ParamType::Integer => arg.value_parser(value_parser!(i64)),
        ParamType::Float => arg.value_parser(value_parser!(f64)),
        ParamType::Path => arg.value_parser(value_parser!(PathBuf)),
        ParamType::String | ParamType::List => arg.value_parser(value_parser!(String)),
    }
}

fn with_defaults(arg: Arg, spec: &ParamSpec) -> Arg {
    match spec.default() {
        None | Some(Value::Null) => arg,
        Some(Value::Array(items)) => arg.default_values(items.iter().map(display_value)),
        Some(value) => arg.default_value(display_value(value)),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn positional(spec: &ParamSpec, index: usize, required: bool) -> Arg {
    let arg = typed(base(spec), spec.ty())
        .index(index)
        .required(required)
        .value_name(spec.name().to_uppercase());
    let arg = if spec.ty() == ParamType::List { arg.num_args(1..) } else { arg };
    with_defaults(arg, spec)
}

fn option(spec: &ParamSpec) -> Arg {
    let arg = typed(base(spec), spec.ty())
        .long(spec.long_name())
        .value_name(spec.ty().to_string().to_uppercase());
    let arg = if spec.ty() == ParamType::List { arg.action(ArgAction::Append) } else { arg };
    with_defaults(arg, spec)
}

fn flag(spec: &ParamSpec) -> Arg {
    if spec.default() == Some(&Value::Bool(true)) {
        base(spec).long(format!("no-{}", spec.long_name())).action(ArgAction::SetFalse)
    } else {
        base(spec).long(spec.long_name()).action(ArgAction::SetTrue)
    }
}

/// Collects the values given on the command line into a dictionary keyed by parameter name.
///
/// Dotted names (`http.timeout.connect`) become nested objects so the result can be merged
/// into a tracked configuration as an override layer.
///
/// # Errors
/// Returns [`FoundationError::Validation`] if `matches` was not produced by a command built
/// from the same parameters.
pub fn extract(
    matches: &ArgMatches,
    params: &[ClassifiedParam],
) -> Result<Map<String, Value>, FoundationError> {
    let mut values = Map::new();

    for param in params {
        let name = param.name();
        let supplied = matches
            .try_contains_id(name)
            .map_err(|e| FoundationError::validation(name.to_owned(), e.to_string()))?;
        if !supplied || matches.value_source(name) != Some(ValueSource::CommandLine) {
            continue;
        }
        if let Some(value) = read(matches, &param.spec)
            .map_err(|e| FoundationError::validation(name.to_owned(), e.to_string()))?
        {
            insert_dotted(&mut values, name, value);
        }
    }

    Ok(values)
}

fn read(matches: &ArgMatches, spec: &ParamSpec) -> Result<Option<Value>, clap::parser::MatchesError> {
    let id = spec.name();
    Ok(match spec.ty() {
        ParamType::Bool => matches.try_get_one::<bool>(id)?.map(|v| Value::Bool(*v)),
        ParamType::Integer => matches.try_get_one::<i64>(id)?.map(|v| Value::from(*v)),
        ParamType::Float => matches.try_get_one::<f64>(id)?.map(|v| Value::from(*v)),
        ParamType::String => matches.try_get_one::<String>(id)?.map(|v| Value::from(v.as_str())),
        ParamType::Path => matches
            .try_get_one::<PathBuf>(id)?
            .map(|v| Value::from(v.to_string_lossy().into_owned())),
        ParamType::List => matches
            .try_get_many::<String>(id)?
            .map(|values| values.map(|v| Value::from(v.as_str())).collect()),
    })
}

fn insert_dotted(target: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            target.insert(path.to_owned(), value);
        },
        Some((head, rest)) => {
            let entry = target.entry(head.to_owned()).or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_dotted(child, rest, value);
            }
        },
    }
}
