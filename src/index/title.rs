//! Title extraction from Markdown files.
//!
//! The title is the remainder of the first line that starts with `"# "` after
//! trimming. Deeper headings (`##`, `###`) never qualify. Files without a
//! qualifying line, and files that cannot be read, fall back to the file stem.

use std::fs;
use std::path::Path;

/// Extract a display title for a Markdown file.
///
/// Fail-soft: read errors are logged to stderr and degrade to the
/// filename-derived title. Never returns an error to the caller.
pub fn extract_title(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(text) => first_heading(&text).unwrap_or_else(|| stem_title(path)),
        Err(e) => {
            eprintln!("[index] could not read {}: {e}", path.display());
            stem_title(path)
        }
    }
}

/// Find the first line whose trimmed form starts with `"# "`.
fn first_heading(text: &str) -> Option<String> {
    for line in text.lines() {
        if let Some(rest) = line.trim().strip_prefix("# ") {
            return Some(rest.trim().to_string());
        }
    }
    None
}

/// Filename with the extension stripped.
fn stem_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_md(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_first_line_heading() {
        let dir = TempDir::new().unwrap();
        let path = write_md(&dir, "01-intro.md", "# Introduction to Java\n\nBody text.");
        assert_eq!(extract_title(&path), "Introduction to Java");
    }

    #[test]
    fn test_heading_after_content_still_wins() {
        let dir = TempDir::new().unwrap();
        let path = write_md(&dir, "notes.md", "Some preamble.\n\n# Actual Title\nMore.");
        assert_eq!(extract_title(&path), "Actual Title");
    }

    #[test]
    fn test_deeper_headings_never_match() {
        let dir = TempDir::new().unwrap();
        let path = write_md(&dir, "sub.md", "## Not a title\n### Nor this\n");
        assert_eq!(extract_title(&path), "sub");
    }

    #[test]
    fn test_no_heading_falls_back_to_stem() {
        let dir = TempDir::new().unwrap();
        let path = write_md(&dir, "02-oop.md", "plain text only\n");
        assert_eq!(extract_title(&path), "02-oop");
    }

    #[test]
    fn test_indented_heading_is_trimmed_first() {
        let dir = TempDir::new().unwrap();
        let path = write_md(&dir, "pad.md", "   # Padded Title   \n");
        assert_eq!(extract_title(&path), "Padded Title");
    }

    #[test]
    fn test_bare_hash_does_not_match() {
        let dir = TempDir::new().unwrap();
        let path = write_md(&dir, "bare.md", "#\n#not-a-heading\n");
        assert_eq!(extract_title(&path), "bare");
    }

    #[test]
    fn test_only_first_match_counts() {
        let dir = TempDir::new().unwrap();
        let path = write_md(&dir, "two.md", "# First\n# Second\n");
        assert_eq!(extract_title(&path), "First");
    }

    #[test]
    fn test_unreadable_file_degrades() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.md");
        // Never written: reading fails, title degrades to the stem
        assert_eq!(extract_title(&path), "missing");
    }
}
