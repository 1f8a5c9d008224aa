//! Content indexer: scans the content tree and regenerates the navigation
//! index the viewer fetches on page load.
//!
//! Pipeline: `scan` (folders + files) -> `title` (per-file, fail-soft) ->
//! `write` (pretty JSON, overwrite). The whole index is rebuilt on every run.

pub mod model;
mod scan;
mod sort;
mod title;
mod write;

pub use model::{Index, IndexEntry, IndexFolder};
pub use scan::{FolderScan, ScannedFile, scan_content};
pub use sort::natural_cmp;
pub use title::extract_title;
pub use write::write_index;

/// Resolve titles and assemble the index from a content scan.
///
/// Title extraction is fail-soft per file, so this step cannot fail.
pub fn build_index(folders: &[FolderScan]) -> Index {
    folders
        .iter()
        .map(|folder| IndexFolder {
            name: folder.name.clone(),
            path: folder.name.clone(),
            files: folder
                .files
                .iter()
                .map(|file| IndexEntry {
                    name: file
                        .abs
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    path: file.rel.clone(),
                    title: extract_title(&file.abs),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShelfConfig;
    use std::fs;
    use tempfile::TempDir;

    /// End-to-end scenario: `java/` with two numbered files and verbatim titles.
    #[test]
    fn test_java_end_to_end() {
        let dir = TempDir::new().unwrap();
        let java = dir.path().join("java");
        fs::create_dir(&java).unwrap();
        fs::write(java.join("01-intro.md"), "# Introduction to Java\n").unwrap();
        fs::write(
            java.join("02-oop.md"),
            "# Object-Oriented Programming in Java\n",
        )
        .unwrap();

        let mut config = ShelfConfig::default();
        config.index.content = dir.path().to_path_buf();

        let folders = scan_content(&config).unwrap();
        let index = build_index(&folders);
        let path = write_index(&config, &index).unwrap();

        let parsed: Index = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "java");
        assert_eq!(parsed[0].path, "java");
        assert_eq!(parsed[0].files.len(), 2);
        assert_eq!(parsed[0].files[0].name, "01-intro.md");
        assert_eq!(parsed[0].files[0].title, "Introduction to Java");
        assert_eq!(parsed[0].files[1].name, "02-oop.md");
        assert_eq!(
            parsed[0].files[1].title,
            "Object-Oriented Programming in Java"
        );
    }

    /// Unchanged content indexes to byte-identical output.
    #[test]
    fn test_regeneration_is_idempotent() {
        let dir = TempDir::new().unwrap();
        for (folder, files) in [("java", vec!["2-a.md", "10-b.md"]), ("rust", vec!["x.md"])] {
            let p = dir.path().join(folder);
            fs::create_dir(&p).unwrap();
            for f in files {
                fs::write(p.join(f), format!("# Title of {f}\n")).unwrap();
            }
        }

        let mut config = ShelfConfig::default();
        config.index.content = dir.path().to_path_buf();

        let run = |config: &ShelfConfig| {
            let folders = scan_content(config).unwrap();
            let index = build_index(&folders);
            let path = write_index(config, &index).unwrap();
            fs::read(path).unwrap()
        };

        assert_eq!(run(&config), run(&config));
    }

    #[test]
    fn test_titles_degrade_to_stem() {
        let dir = TempDir::new().unwrap();
        let notes = dir.path().join("notes");
        fs::create_dir(&notes).unwrap();
        fs::write(notes.join("plain.md"), "no heading here\n").unwrap();

        let mut config = ShelfConfig::default();
        config.index.content = dir.path().to_path_buf();

        let index = build_index(&scan_content(&config).unwrap());
        assert_eq!(index[0].files[0].title, "plain");
    }
}
