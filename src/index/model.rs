//! Navigation index data model.
//!
//! The generated `index.json` is an array of folder objects. Field order is
//! fixed by struct declaration order, which keeps reruns over unchanged
//! content byte-identical.

use serde::{Deserialize, Serialize};

/// One Markdown file in the navigation index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Filename with extension.
    pub name: String,
    /// Slash-separated path relative to the content root.
    pub path: String,
    /// Display title, from the first `# ` heading or the file stem.
    pub title: String,
}

/// One top-level content folder and its files, in natural order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexFolder {
    /// Directory name.
    pub name: String,
    /// Directory name again (top-level folders only).
    pub path: String,
    /// Files in natural order.
    pub files: Vec<IndexEntry>,
}

/// The whole index: folders in lexicographic name order.
pub type Index = Vec<IndexFolder>;
