use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Value type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Bool,
    String,
    Integer,
    Float,
    Path,
    /// Repeated string values.
    List,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Path => "path",
            Self::List => "list",
        })
    }
}

/// Explicit placement requested for a parameter, overriding the classification rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamHint {
    Argument,
    Option,
    Flag,
}

/// A parameter to expose on the command line.
///
/// ```rust
/// use bedrock_cli::{ParamHint, ParamSpec, ParamType};
///
/// let spec = ParamSpec::new("retries", ParamType::Integer)
///     .with_default(3)
///     .with_hint(ParamHint::Option)
///     .with_help("How many times to retry");
/// assert_eq!(spec.default(), Some(&serde_json::json!(3)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    name: String,
    ty: ParamType,
    default: Option<Value>,
    hint: Option<ParamHint>,
    help: Option<String>,
}

impl ParamSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self { name: name.into(), ty, default: None, hint: None, help: None }
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    #[must_use]
    pub const fn with_hint(mut self, hint: ParamHint) -> Self {
        self.hint = Some(hint);
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn ty(&self) -> ParamType {
        self.ty
    }

    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[must_use]
    pub const fn hint(&self) -> Option<ParamHint> {
        self.hint
    }

    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// The `--long` name: underscores become dashes.
    #[must_use]
    pub fn long_name(&self) -> String {
        self.name.replace('_', "-")
    }
}

/// Where a parameter ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParamKind {
    /// A positional argument.
    Argument { required: bool },
    /// A `--name VALUE` option.
    Option,
    /// A boolean `--name` switch.
    Flag,
}

impl ParamKind {
    #[must_use]
    pub const fn is_positional(self) -> bool {
        matches!(self, Self::Argument { .. })
    }
}

/// A parameter together with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedParam {
    pub spec: ParamSpec,
    pub kind: ParamKind,
}

impl ClassifiedParam {
    #[must_use]
    pub fn name(&self) -> &str {
        self.spec.name()
    }
}

/// Tunables of [`classify`](crate::classify).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyPolicy {
    /// Turn the first undecorated parameter with a default into an optional positional
    /// argument, provided no positional argument precedes it.
    pub first_positional: bool,
}

impl Default for ClassifyPolicy {
    fn default() -> Self {
        Self { first_positional: true }
    }
}

impl ClassifyPolicy {
    /// Every defaulted parameter becomes an option.
    #[must_use]
    pub const fn options_only() -> Self {
        Self { first_positional: false }
    }
}
