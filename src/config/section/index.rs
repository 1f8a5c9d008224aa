//! `[index]` section configuration.
//!
//! Controls where content lives and how the navigation index is generated.
//!
//! # Example
//!
//! ```toml
//! [index]
//! content = "content"      # Content directory (relative to project root)
//! output = "index.json"    # Index file name, written inside the content dir
//! extension = "md"         # Markdown file extension to index
//! recursive = false        # Descend below the first folder level
//! ```
//!
//! With `recursive = false` (the default) only files directly inside each
//! top-level folder are indexed. With `recursive = true` every Markdown file
//! below a top-level folder is collected into that folder's entry, keeping
//! its root-relative path.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Content indexing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Content directory, resolved against the project root at load time.
    pub content: PathBuf,

    /// Index file name, written inside the content directory.
    pub output: String,

    /// Markdown file extension (without the dot).
    pub extension: String,

    /// Collect files from nested subfolders instead of one level only.
    pub recursive: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            content: PathBuf::from("content"),
            output: "index.json".into(),
            extension: "md".into(),
            recursive: false,
        }
    }
}

impl IndexConfig {
    /// Absolute path of the generated index file.
    pub fn output_path(&self) -> PathBuf {
        self.content.join(&self.output)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_index_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.index.content, std::path::PathBuf::from("content"));
        assert_eq!(config.index.output, "index.json");
        assert_eq!(config.index.extension, "md");
        assert!(!config.index.recursive);
    }

    #[test]
    fn test_index_config_override() {
        let config =
            test_parse_config("[index]\ncontent = \"docs\"\nrecursive = true\nextension = \"markdown\"");

        assert_eq!(config.index.content, std::path::PathBuf::from("docs"));
        assert!(config.index.recursive);
        assert_eq!(config.index.extension, "markdown");
    }

    #[test]
    fn test_index_config_partial_override() {
        let config = test_parse_config("[index]\noutput = \"nav.json\"");

        assert_eq!(config.index.output, "nav.json");
        // content uses default
        assert_eq!(config.index.content, std::path::PathBuf::from("content"));
    }
}
