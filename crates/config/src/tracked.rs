//! # Tracked configuration
//!
//! [`Tracked`] wraps a [`ConfigModel`] and records, per dotted field path, which
//! [`ConfigSource`] last supplied the value and what the value was before it was first changed.
//!
//! Every mutation is atomic: the candidate dictionary is deserialized into the model,
//! checked for unknown fields and validated before anything is committed.

use crate::diff::{ConfigDiff, FieldChange};
use crate::error::{ConfigError, ConfigErrorExt};
use crate::model::ConfigModel;
use crate::path;
use crate::source::ConfigSource;
use bedrock_errors::FoundationError;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Deref;
use tracing::{debug, trace};

/// The value a field held before its first modification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OriginalValue {
    pub value: Option<Value>,
    pub source: ConfigSource,
}

/// Introspection record for one leaf field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    pub path: String,
    pub value: Value,
    pub source: ConfigSource,
}

/// A configuration model with per-field source attribution and original-value history.
#[derive(Debug, Clone)]
pub struct Tracked<T: ConfigModel> {
    value: T,
    current: Value,
    defaults: Value,
    sources: BTreeMap<String, ConfigSource>,
    originals: BTreeMap<String, OriginalValue>,
}

impl<T: ConfigModel> Tracked<T> {
    /// Creates a tracked model from `T::default()`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Serde`] if the model cannot be represented as a dictionary, or
    /// [`ConfigError::Invalid`] if the defaults do not validate.
    pub fn new() -> Result<Self, ConfigError> {
        let value = T::default();
        let current = serde_json::to_value(&value).context("Serializing model defaults")?;
        ensure_object::<T>(&current)?;
        value.validate()?;

        Ok(Self {
            value,
            current: current.clone(),
            defaults: current,
            sources: BTreeMap::new(),
            originals: BTreeMap::new(),
        })
    }

    /// Creates a tracked model whose defaults are `defaults` merged over `T::default()`.
    ///
    /// [`Tracked::reset`] and [`Tracked::reset_all`] return to this baseline.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for unknown fields, type mismatches or failed validation.
    pub fn with_defaults(defaults: Value) -> Result<Self, ConfigError> {
        let mut base = Self::new()?;
        let (value, current) = base.candidate(defaults)?;

        base.value = value;
        base.defaults = current.clone();
        base.current = current;
        Ok(base)
    }

    /// Constructs a model from a dictionary, attributing every supplied field to `source`.
    ///
    /// # Errors
    /// See [`Tracked::merge`].
    pub fn from_value(value: Value, source: ConfigSource) -> Result<Self, ConfigError> {
        let mut tracked = Self::new()?;
        tracked.merge(value, source)?;
        Ok(tracked)
    }

    /// Merges a (possibly nested) dictionary. Every leaf it supplies is attributed to `source`.
    /// Dotted keys (`{"http.port": 9000}`) address the same leaves as their nested form.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if the dictionary names unknown fields, carries values of
    /// the wrong type, or the merged model fails [`ConfigModel::validate`]. The model is left
    /// unchanged on error.
    pub fn merge(&mut self, incoming: Value, source: ConfigSource) -> Result<(), ConfigError> {
        let incoming = path::expand(incoming);
        let leaves: Vec<String> = path::flatten(&incoming).into_keys().collect();
        let (value, current) = self.candidate(incoming)?;

        for leaf in &leaves {
            self.remember_original(leaf);
            self.sources.insert(leaf.clone(), source.clone());
        }
        trace!(fields = leaves.len(), %source, "Merged configuration values");

        self.value = value;
        self.current = current;
        Ok(())
    }

    /// Sets a single field.
    ///
    /// # Errors
    /// See [`Tracked::merge`].
    pub fn set(
        &mut self,
        path: &str,
        value: impl Into<Value>,
        source: ConfigSource,
    ) -> Result<(), ConfigError> {
        self.merge(path::nest(path, value.into()), source)
    }

    /// Restores one field (or every field under an object path) to its default.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if `path` does not name a field.
    pub fn reset(&mut self, field: &str) -> Result<(), ConfigError> {
        if path::get(&self.current, field).is_none() {
            return Err(unknown_field(field));
        }

        let mut candidate = self.current.clone();
        match path::get(&self.defaults, field) {
            Some(default) => path::set(&mut candidate, field, default.clone()),
            None => {
                path::remove(&mut candidate, field);
            },
        }
        let (value, current) = Self::check(candidate, &[])?;

        self.sources.retain(|p, _| !path::is_within(p, field));
        self.originals.retain(|p, _| !path::is_within(p, field));
        debug!(field, "Reset configuration field to default");

        self.value = value;
        self.current = current;
        Ok(())
    }

    /// Restores every field to its default and forgets all sources and original values.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if the defaults no longer deserialize into the model.
    pub fn reset_all(&mut self) -> Result<(), ConfigError> {
        let (value, current) = Self::check(self.defaults.clone(), &[])?;
        self.value = value;
        self.current = current;
        self.sources.clear();
        self.originals.clear();
        Ok(())
    }

    /// Returns a copy with `overrides` merged on top.
    ///
    /// # Errors
    /// See [`Tracked::merge`].
    pub fn with_overrides(&self, overrides: Value, source: ConfigSource) -> Result<Self, ConfigError> {
        let mut copy = self.clone();
        copy.merge(overrides, source)?;
        Ok(copy)
    }

    /// Runs [`ConfigModel::validate`] on the current value.
    ///
    /// # Errors
    /// Returns the model's validation error wrapped in [`ConfigError::Invalid`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.value.validate().map_err(ConfigError::from)
    }

    pub const fn value(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    /// Current value at a dotted path. Object paths return the whole sub-tree.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        path::get(&self.current, field)
    }

    /// Which origin last set `field`. Leaves never set explicitly report [`ConfigSource::Default`];
    /// unknown paths and object paths return `None`.
    #[must_use]
    pub fn source_of(&self, field: &str) -> Option<&ConfigSource> {
        if let Some(source) = self.sources.get(field) {
            return Some(source);
        }
        match path::get(&self.current, field) {
            Some(Value::Object(map)) if !map.is_empty() => None,
            Some(_) => Some(&ConfigSource::Default),
            None => None,
        }
    }

    /// The value `field` held before its first modification, if it was modified.
    #[must_use]
    pub fn original_value(&self, field: &str) -> Option<&OriginalValue> {
        self.originals.get(field)
    }

    /// Every leaf field with its current value and source.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldInfo> {
        path::flatten(&self.current)
            .into_iter()
            .map(|(path, value)| {
                let source = self.sources.get(&path).cloned().unwrap_or(ConfigSource::Default);
                FieldInfo { path, value, source }
            })
            .collect()
    }

    /// Dictionary form of the current value.
    #[must_use]
    pub const fn to_value(&self) -> &Value {
        &self.current
    }

    /// Dotted-path leaf map of the current value.
    #[must_use]
    pub fn to_flat(&self) -> BTreeMap<String, Value> {
        path::flatten(&self.current)
    }

    /// Dictionary form of the defaults baseline.
    #[must_use]
    pub const fn defaults(&self) -> &Value {
        &self.defaults
    }

    /// Fields that differ between `self` (old) and `other` (new).
    #[must_use]
    pub fn diff(&self, other: &Self) -> ConfigDiff {
        let ours = self.to_flat();
        let theirs = other.to_flat();
        let paths: BTreeSet<&String> = ours.keys().chain(theirs.keys()).collect();

        let changes = paths
            .into_iter()
            .filter(|p| ours.get(*p) != theirs.get(*p))
            .map(|p| FieldChange {
                path: p.clone(),
                old: ours.get(p).cloned(),
                new: theirs.get(p).cloned(),
                old_source: self.source_of(p).cloned(),
                new_source: other.source_of(p).cloned(),
            })
            .collect();

        ConfigDiff::new(changes)
    }

    /// Fields whose current value differs from their recorded original value.
    #[must_use]
    pub fn changes(&self) -> ConfigDiff {
        let changes = self
            .originals
            .iter()
            .filter_map(|(p, original)| {
                let current = path::get(&self.current, p);
                (current != original.value.as_ref()).then(|| FieldChange {
                    path: p.clone(),
                    old: original.value.clone(),
                    new: current.cloned(),
                    old_source: Some(original.source.clone()),
                    new_source: self.source_of(p).cloned(),
                })
            })
            .collect();

        ConfigDiff::new(changes)
    }

    fn remember_original(&mut self, leaf: &str) {
        if self.originals.contains_key(leaf) {
            return;
        }
        let source = self.sources.get(leaf).cloned().unwrap_or(ConfigSource::Default);
        let value = path::get(&self.current, leaf).cloned();
        self.originals.insert(leaf.to_owned(), OriginalValue { value, source });
    }

    /// Merges `incoming` over the current dictionary and checks the result.
    fn candidate(&self, incoming: Value) -> Result<(T, Value), ConfigError> {
        if !incoming.is_object() {
            return Err(FoundationError::Validation {
                field: None,
                message: "configuration values must be a dictionary".into(),
                context: None,
            }
            .into());
        }
        let incoming = path::expand(incoming);
        let leaves: Vec<String> = path::flatten(&incoming).into_keys().collect();
        let mut candidate = self.current.clone();
        path::merge(&mut candidate, incoming);
        Self::check(candidate, &leaves)
    }

    /// Deserializes, normalizes and validates a candidate dictionary.
    ///
    /// `supplied` leaves must survive the round trip through the model, otherwise they name
    /// fields the model does not have.
    fn check(candidate: Value, supplied: &[String]) -> Result<(T, Value), ConfigError> {
        let value: T = serde_json::from_value(candidate).map_err(|e| FoundationError::Validation {
            field: None,
            message: e.to_string().into(),
            context: Some(std::any::type_name::<T>().into()),
        })?;
        let normalized = serde_json::to_value(&value).context("Serializing configuration")?;

        if let Some(unknown) = supplied.iter().find(|p| path::get(&normalized, p).is_none()) {
            return Err(unknown_field(unknown));
        }

        value.validate()?;
        Ok((value, normalized))
    }
}

impl<T: ConfigModel> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T: ConfigModel + PartialEq> PartialEq for Tracked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.sources == other.sources
    }
}

fn unknown_field(field: &str) -> ConfigError {
    ConfigError::validation(field.to_owned(), "unknown configuration field")
}

fn ensure_object<T>(value: &Value) -> Result<(), ConfigError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(ConfigError::Internal {
            message: format!("{} does not serialize to a dictionary", std::any::type_name::<T>())
                .into(),
            context: None,
        })
    }
}
