//! Index serialization and persistence.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::ShelfConfig;
use crate::index::model::Index;

/// Serialize the index (pretty, 2-space indentation) and overwrite the index
/// file inside the content root.
///
/// The file is rewritten wholesale on every run; it is derived data with no
/// identity of its own.
pub fn write_index(config: &ShelfConfig, index: &Index) -> Result<PathBuf> {
    let path = config.index.output_path();
    let json = serde_json::to_string_pretty(index).context("failed to serialize index")?;

    fs::write(&path, json)
        .with_context(|| format!("failed to write index file '{}'", path.display()))?;

    Ok(path)
}
