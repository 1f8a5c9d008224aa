//! `mdshelf index` - regenerate the navigation index.
//!
//! Scan the content tree, resolve titles, overwrite the index file, and print
//! a nested summary of what was indexed.

use anyhow::Result;

use crate::{config::ShelfConfig, index, log, utils::plural_count};

/// Run the index command.
///
/// Per-file title errors degrade locally; scan or write errors propagate and
/// terminate the process with a non-zero status.
pub fn run_index(config: &ShelfConfig) -> Result<()> {
    let folders = index::scan_content(config)?;
    let built = index::build_index(&folders);
    let path = index::write_index(config, &built)?;

    let file_count: usize = built.iter().map(|f| f.files.len()).sum();
    log!(
        "index";
        "{}, {} -> {}",
        plural_count(built.len(), "folder"),
        plural_count(file_count, "file"),
        path.display()
    );
    for folder in &built {
        println!("  {}/", folder.name);
        for file in &folder.files {
            println!("    {} - {}", file.name, file.title);
        }
    }

    Ok(())
}
