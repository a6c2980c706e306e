use anyhow::{Context, Result};
use serde::Deserialize;
use standoff_export_engine::Item;
use std::path::Path;

/// An items file: a list of `[[items]]` tables.
#[derive(Debug, Default, Deserialize)]
pub struct ItemsFile {
    #[serde(default)]
    pub items: Vec<Item>,
}

pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read items file {}", path.display()))?;
    let file: ItemsFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse items file {}", path.display()))?;
    Ok(file.items)
}
