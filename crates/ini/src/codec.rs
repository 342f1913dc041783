use crate::cache::IniCache;
use crate::document::{DEFAULT_SECTION, IniDocument, Section};
use crate::error::{IniError, IniErrorExt};
use ini::{Ini, ParseOption};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Parses INI text through the process-wide [`IniCache`].
///
/// Identical text returns the same shared document without parsing again.
///
/// # Errors
/// Returns [`IniError::Parse`] for invalid syntax and [`IniError::Structure`] for keys
/// outside any section or duplicated sections/keys.
pub fn loads(text: &str) -> Result<Arc<IniDocument>, IniError> {
    IniCache::global().loads(text)
}

/// Parses INI text without consulting any cache.
///
/// Quotes and backslashes are kept verbatim; surrounding whitespace of keys and values is
/// trimmed.
///
/// # Errors
/// See [`loads`].
pub fn parse(text: &str) -> Result<IniDocument, IniError> {
    let options =
        ParseOption { enabled_quote: false, enabled_escape: false, ..ParseOption::default() };
    let parsed = Ini::load_from_str_opt(text, options)?;

    let mut sections: BTreeMap<String, Section> = BTreeMap::new();
    let mut seen = BTreeSet::new();

    for (name, properties) in parsed.iter() {
        let Some(name) = name else {
            if let Some((key, _)) = properties.iter().next() {
                return Err(IniError::structure(format!(
                    "key '{key}' appears before any section header"
                )));
            }
            continue;
        };
        if !seen.insert(name) {
            return Err(IniError::structure(format!("duplicate section '{name}'")));
        }

        let section = sections.entry(name.to_owned()).or_default();
        for (key, value) in properties.iter() {
            if section.insert(key.to_owned(), value.to_owned()).is_some() {
                return Err(IniError::structure(format!(
                    "duplicate key '{key}' in section '{name}'"
                )));
            }
        }
    }

    Ok(IniDocument::from(sections))
}

/// Serializes a document: `[section]` headers, `key = value` lines and a blank line between
/// sections, with [`DEFAULT_SECTION`] written first.
///
/// # Errors
/// Returns [`IniError::Structure`] for names or values that would not read back unchanged:
/// line breaks anywhere, `]` in section names, values with leading or trailing whitespace,
/// and keys that are empty, padded, contain `=`/`:` or start with `[`, `;` or `#`.
pub fn dumps(document: &IniDocument) -> Result<String, IniError> {
    let ordered = document
        .section(DEFAULT_SECTION)
        .map(|section| (DEFAULT_SECTION, section))
        .into_iter()
        .chain(document.iter().filter(|(name, _)| *name != DEFAULT_SECTION));

    let mut out = String::new();
    for (index, (name, section)) in ordered.enumerate() {
        check_section_name(name)?;
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "[{name}]");

        for (key, value) in section {
            check_key(name, key)?;
            if has_line_break(value) {
                return Err(IniError::structure(format!(
                    "value of '{name}.{key}' contains a line break"
                )));
            }
            if value.trim() != value {
                return Err(IniError::structure(format!(
                    "value of '{name}.{key}' has leading or trailing whitespace"
                )));
            }
            let _ = writeln!(out, "{key} = {value}");
        }
    }

    Ok(out)
}

/// Reads and parses a file through the process-wide cache.
///
/// # Errors
/// Returns [`IniError::Io`] if the file cannot be read, otherwise see [`loads`].
pub fn load(path: impl AsRef<Path>) -> Result<Arc<IniDocument>, IniError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).context(format!("Reading {}", path.display()))?;
    debug!(path = %path.display(), "Loading INI file");
    loads(&text).context(path.display().to_string())
}

/// Serializes `document` into a file, replacing its contents.
///
/// # Errors
/// Returns [`IniError::Io`] if the file cannot be written, otherwise see [`dumps`].
pub fn dump(path: impl AsRef<Path>, document: &IniDocument) -> Result<(), IniError> {
    let path = path.as_ref();
    let text = dumps(document)?;
    fs::write(path, text).context(format!("Writing {}", path.display()))?;
    debug!(path = %path.display(), sections = document.len(), "Wrote INI file");
    Ok(())
}

fn has_line_break(text: &str) -> bool {
    text.contains(['\n', '\r'])
}

fn check_section_name(name: &str) -> Result<(), IniError> {
    if name.is_empty() || name.trim() != name || name.contains(']') || has_line_break(name) {
        return Err(IniError::structure(format!("invalid section name '{name}'")));
    }
    Ok(())
}

fn check_key(section: &str, key: &str) -> Result<(), IniError> {
    let invalid = key.is_empty()
        || key.trim() != key
        || key.contains(['=', ':'])
        || key.starts_with(['[', ';', '#'])
        || has_line_break(key);

    if invalid {
        return Err(IniError::structure(format!("invalid key '{key}' in section '{section}'")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dumps_writes_default_first_with_blank_lines() {
        let document: IniDocument = [
            ("alpha", "a", "1"),
            (DEFAULT_SECTION, "shared", "yes"),
            ("beta", "b", "two words"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            dumps(&document).unwrap(),
            "[DEFAULT]\nshared = yes\n\n[alpha]\na = 1\n\n[beta]\nb = two words\n"
        );
    }

    #[test]
    fn empty_document_dumps_to_nothing() {
        assert_eq!(dumps(&IniDocument::new()).unwrap(), "");
    }

    #[test]
    fn keys_outside_sections_are_rejected() {
        let err = parse("orphan = 1\n[section]\nkey = value\n").unwrap_err();
        assert_eq!(err.code(), "INI_STRUCTURE");
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        assert!(parse("[s]\nk = 1\nk = 2\n").is_err());
    }

    #[test]
    fn quotes_and_backslashes_are_literal() {
        let document = parse("[paths]\nwin = C:\\temp\nquoted = \"x\"\n").unwrap();
        assert_eq!(document.get("paths", "win"), Some("C:\\temp"));
        assert_eq!(document.get("paths", "quoted"), Some("\"x\""));
    }

    #[test]
    fn unrepresentable_entries_are_rejected() {
        let cases: [(&str, &str, &str); 7] = [
            ("s", "k", "line\nbreak"),
            ("s", "k", " padded"),
            ("s", "k", "trail "),
            ("s", "a=b", "v"),
            ("s", "a:b", "v"),
            ("s", "[k", "v"),
            ("bad]", "k", "v"),
        ];
        for (section, key, value) in cases {
            let document: IniDocument = [(section, key, value)].into_iter().collect();
            assert!(dumps(&document).is_err(), "{section}/{key}/{value:?} should be rejected");
        }
    }
}
