use crate::source::ConfigSource;
use serde::Serialize;
use serde_json::Value;

/// One field that differs between two configuration states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub path: String,
    /// `None` when the field does not exist on the old side.
    pub old: Option<Value>,
    /// `None` when the field does not exist on the new side.
    pub new: Option<Value>,
    pub old_source: Option<ConfigSource>,
    pub new_source: Option<ConfigSource>,
}

/// Ordered (by path) list of [`FieldChange`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigDiff {
    changes: Vec<FieldChange>,
}

impl ConfigDiff {
    pub(crate) const fn new(changes: Vec<FieldChange>) -> Self {
        Self { changes }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldChange> {
        self.changes.iter()
    }

    /// Paths of every changed field.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().map(|c| c.path.as_str())
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&FieldChange> {
        self.changes.iter().find(|c| c.path == path)
    }
}

impl IntoIterator for ConfigDiff {
    type Item = FieldChange;
    type IntoIter = std::vec::IntoIter<FieldChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConfigDiff {
    type Item = &'a FieldChange;
    type IntoIter = std::slice::Iter<'a, FieldChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
