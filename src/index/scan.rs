//! Content directory scanning.
//!
//! Enumerates one level of subfolders under the content root, then collects
//! Markdown files per folder - directly contained by default, or from the
//! whole subtree when `[index] recursive = true`. Hidden names (leading dot)
//! are skipped at every depth.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::ShelfConfig;
use crate::index::sort::natural_cmp;
use crate::utils::path::is_hidden;

/// A Markdown file found during scanning.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Absolute path on disk.
    pub abs: PathBuf,
    /// Slash-separated path relative to the content root.
    pub rel: String,
}

/// One content folder and the files it yielded.
#[derive(Debug)]
pub struct FolderScan {
    /// Directory name.
    pub name: String,
    /// Files in natural order of their relative path.
    pub files: Vec<ScannedFile>,
}

/// Scan the content root for folders with Markdown files.
///
/// Folders that yield no files are omitted. The result is sorted by folder
/// name; each folder's files are in natural order.
pub fn scan_content(config: &ShelfConfig) -> Result<Vec<FolderScan>> {
    let content = &config.index.content;
    let ext = config.index.extension.as_str();

    let entries = fs::read_dir(content)
        .with_context(|| format!("failed to list content directory '{}'", content.display()))?;

    let mut folders = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read entry in '{}'", content.display()))?;
        let path = entry.path();
        if !path.is_dir() || is_hidden(&entry.file_name()) {
            continue;
        }

        let mut files = Vec::new();
        if config.index.recursive {
            collect_recursive(&mut files, &path, content, ext)?;
        } else {
            collect_shallow(&mut files, &path, content, ext)?;
        }

        if files.is_empty() {
            continue;
        }

        files.sort_by(|a, b| natural_cmp(&a.rel, &b.rel));
        folders.push(FolderScan {
            name: entry.file_name().to_string_lossy().into_owned(),
            files,
        });
    }

    folders.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(folders)
}

/// Collect Markdown files directly inside `dir`.
fn collect_shallow(
    files: &mut Vec<ScannedFile>,
    dir: &Path,
    content_root: &Path,
    ext: &str,
) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to list '{}'", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in '{}'", dir.display()))?;
        let path = entry.path();
        if path.is_file() && has_extension(&path, ext) {
            files.push(scanned(path, content_root));
        }
    }
    Ok(())
}

/// Collect Markdown files from the whole subtree under `dir`,
/// skipping hidden directories at every depth.
fn collect_recursive(
    files: &mut Vec<ScannedFile>,
    dir: &Path,
    content_root: &Path,
    ext: &str,
) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to list '{}'", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in '{}'", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            if is_hidden(&entry.file_name()) {
                continue;
            }
            collect_recursive(files, &path, content_root, ext)?;
        } else if has_extension(&path, ext) {
            files.push(scanned(path, content_root));
        }
    }
    Ok(())
}

fn scanned(abs: PathBuf, content_root: &Path) -> ScannedFile {
    let rel = abs
        .strip_prefix(content_root)
        .unwrap_or(&abs)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    ScannedFile { abs, rel }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ext)
}
