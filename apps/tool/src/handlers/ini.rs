use anyhow::{Context, Result};
use bedrock::ini::{dump, dumps, from_value, load, to_value};
use serde_json::Value;
use std::fs;
use std::path::Path;

pub fn to_json(file: &Path, raw: bool) -> Result<()> {
    let document = load(file).with_context(|| format!("Failed to load {}", file.display()))?;
    let value = if raw { serde_json::to_value(&*document)? } else { to_value(&document) };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub fn from_json(file: &Path, out: Option<&Path>) -> Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let value: Value =
        serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", file.display()))?;
    let document = from_value(&value)?;

    match out {
        Some(path) => {
            dump(path, &document).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("wrote {}", path.display());
        },
        None => print!("{}", dumps(&document)?),
    }
    Ok(())
}
