use crate::param::{ClassifiedParam, ClassifyPolicy, ParamHint, ParamKind, ParamSpec, ParamType};
use bedrock_errors::FoundationError;
use std::collections::HashSet;
use tracing::debug;

const RESERVED_LONG: [&str; 1] = ["help"];

/// Decides how each parameter appears on the command line.
///
/// Rules, first match wins:
/// 1. an explicit [`ParamHint`];
/// 2. a [`ParamType::Bool`] parameter is a flag;
/// 3. a parameter without a default is a required positional argument;
/// 4. with [`ClassifyPolicy::first_positional`], the first undecorated parameter with a
///    default becomes an optional positional argument unless a positional came before it;
/// 5. everything else is an option.
///
/// # Errors
/// Returns [`FoundationError::Validation`] for empty, duplicate or reserved names, a flag
/// hint on a non-boolean parameter, and positional layouts a parser cannot resolve: a
/// required argument after an optional one, or any argument after a list argument.
pub fn classify(
    params: &[ParamSpec],
    policy: ClassifyPolicy,
) -> Result<Vec<ClassifiedParam>, FoundationError> {
    let mut names = HashSet::new();
    let mut longs = HashSet::new();
    let mut positional_claimed = false;
    let mut classified = Vec::with_capacity(params.len());

    for spec in params {
        check_name(spec, &mut names, &mut longs)?;

        let kind = match (spec.hint(), spec.ty(), spec.default()) {
            (Some(ParamHint::Flag), ParamType::Bool, _) => ParamKind::Flag,
            (Some(ParamHint::Flag), ty, _) => {
                return Err(FoundationError::validation(
                    spec.name().to_owned(),
                    format!("only bool parameters can be flags, not {ty}"),
                ));
            },
            (Some(ParamHint::Option), ..) => ParamKind::Option,
            (Some(ParamHint::Argument), _, default) => {
                ParamKind::Argument { required: default.is_none() }
            },
            (None, ParamType::Bool, _) => ParamKind::Flag,
            (None, _, None) => ParamKind::Argument { required: true },
            (None, _, Some(_)) if policy.first_positional && !positional_claimed => {
                ParamKind::Argument { required: false }
            },
            (None, _, Some(_)) => ParamKind::Option,
        };

        if kind.is_positional() {
            positional_claimed = true;
            check_positional_order(spec, kind, &classified)?;
        }
        debug!(name = spec.name(), ?kind, "Classified parameter");
        classified.push(ClassifiedParam { spec: spec.clone(), kind });
    }

    Ok(classified)
}

fn check_name(
    spec: &ParamSpec,
    names: &mut HashSet<String>,
    longs: &mut HashSet<String>,
) -> Result<(), FoundationError> {
    let name = spec.name();
    if name.trim().is_empty() || name.starts_with('-') {
        return Err(FoundationError::validation("name", format!("invalid parameter name '{name}'")));
    }
    if !names.insert(name.to_owned()) {
        return Err(FoundationError::validation(
            name.to_owned(),
            "duplicate parameter name",
        ));
    }
    let long = spec.long_name();
    if RESERVED_LONG.contains(&long.as_str()) {
        return Err(FoundationError::validation(name.to_owned(), format!("--{long} is reserved")));
    }
    if !longs.insert(long.clone()) {
        return Err(FoundationError::validation(
            name.to_owned(),
            format!("--{long} clashes with another parameter"),
        ));
    }
    Ok(())
}

fn check_positional_order(
    spec: &ParamSpec,
    kind: ParamKind,
    before: &[ClassifiedParam],
) -> Result<(), FoundationError> {
    let mut positionals = before.iter().filter(|p| p.kind.is_positional());

    if let Some(list) = positionals.clone().find(|p| p.spec.ty() == ParamType::List) {
        return Err(FoundationError::validation(
            spec.name().to_owned(),
            format!("positional argument cannot follow list argument '{}'", list.name()),
        ));
    }
    if kind == (ParamKind::Argument { required: true })
        && let Some(optional) =
            positionals.find(|p| p.kind == ParamKind::Argument { required: false })
    {
        return Err(FoundationError::validation(
            spec.name().to_owned(),
            format!("required argument cannot follow optional argument '{}'", optional.name()),
        ));
    }
    Ok(())
}
