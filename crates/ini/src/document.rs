use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the section whose keys every other section inherits.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Keys and values of one section.
pub type Section = BTreeMap<String, String>;

/// An INI document: `section -> key -> value`, all strings, ordered by name.
///
/// Lookups through [`IniDocument::get`] fall back to the [`DEFAULT_SECTION`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IniDocument {
    sections: BTreeMap<String, Section>,
}

impl IniDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `key` in `section`, or in [`DEFAULT_SECTION`] when the section lacks it.
    ///
    /// Returns `None` when `section` does not exist, even if the default section has the key.
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let own = self.sections.get(section)?;
        own.get(key)
            .or_else(|| self.sections.get(DEFAULT_SECTION).and_then(|d| d.get(key)))
            .map(String::as_str)
    }

    /// Inserts or replaces a value, creating the section when needed.
    pub fn set(
        &mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.sections.entry(section.into()).or_default().insert(key.into(), value.into())
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Creates an empty section if it is missing.
    pub fn add_section(&mut self, name: impl Into<String>) -> &mut Section {
        self.sections.entry(name.into()).or_default()
    }

    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        self.sections.remove(name)
    }

    #[must_use]
    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Section names in document order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, section)| (name.as_str(), section))
    }

    /// Number of sections, including [`DEFAULT_SECTION`] when present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl From<BTreeMap<String, Section>> for IniDocument {
    fn from(sections: BTreeMap<String, Section>) -> Self {
        Self { sections }
    }
}

impl<S, K, V> FromIterator<(S, K, V)> for IniDocument
where
    S: Into<String>,
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, K, V)>>(iter: I) -> Self {
        let mut document = Self::new();
        for (section, key, value) in iter {
            document.set(section, key, value);
        }
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_falls_back_to_default_section() {
        let document: IniDocument = [
            (DEFAULT_SECTION, "timeout", "30"),
            ("server", "host", "example.org"),
            ("server", "timeout", "5"),
            ("client", "host", "localhost"),
        ]
        .into_iter()
        .collect();

        assert_eq!(document.get("server", "timeout"), Some("5"));
        assert_eq!(document.get("client", "timeout"), Some("30"));
        assert_eq!(document.get("missing", "timeout"), None);
        assert_eq!(document.get("client", "port"), None);
    }

    #[test]
    fn sections_are_ordered_by_name() {
        let document: IniDocument =
            [("zeta", "a", "1"), ("alpha", "b", "2")].into_iter().collect();
        assert_eq!(document.section_names().collect::<Vec<_>>(), ["alpha", "zeta"]);
    }
}
