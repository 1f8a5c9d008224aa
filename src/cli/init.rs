//! Project initialization.
//!
//! Creates the default configuration and a content directory skeleton with
//! one sample folder, enough for `mdshelf index` and `mdshelf serve` to run.

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::{config::ShelfConfig, log};

/// Default configuration written by `mdshelf init`.
const CONFIG_TEMPLATE: &str = r#"[index]
content = "content"       # Content directory (relative to project root)
output = "index.json"     # Index file name, written inside the content dir
extension = "md"          # Markdown file extension to index
recursive = false         # Descend below the first folder level

[serve]
interface = "127.0.0.1"   # Network interface (127.0.0.1 = localhost only)
port = 8377               # HTTP port number

[cache]
offline = true            # false = pass-through mode (no caching at all)
name = "mdshelf"          # Cache store name prefix
version = "v1"            # Bump to retire previous cache generations
shell = "/index.html"     # Navigation fallback when the network fails
sync_tag = "refresh-index"
index_path = "/content/index.json"
precache = [
    "/",
    "/index.html",
    "/styles.css",
    "/app.js",
    "/vendor/marked.min.js",
    "/vendor/highlight.min.js",
    "/vendor/highlight.css",
    "/manifest.webmanifest",
    "/icons/icon-192.png",
    "/icons/icon-512.png",
]

[push]
title = "mdshelf"
body = "New reading material is available."
"#;

const SAMPLE_FOLDER: &str = "getting-started";
const SAMPLE_FILE: &str = "01-welcome.md";
const SAMPLE_CONTENT: &str = "# Welcome to mdshelf\n\n\
Drop Markdown files into folders under `content/` and run `mdshelf index`\n\
to rebuild the navigation index your reader loads.\n";

/// Create a new project at the configured root.
pub fn new_project(config: &ShelfConfig) -> Result<()> {
    let root = config.get_root();

    if config.config_path.exists() {
        log!(
            "error";
            "'{}' already exists, refusing to overwrite",
            config.config_path.display()
        );
        std::process::exit(1);
    }

    create_structure(root)?;
    fs::write(&config.config_path, CONFIG_TEMPLATE).with_context(|| {
        format!("failed to write '{}'", config.config_path.display())
    })?;

    log!("init"; "project initialized at {}", root.display());
    log!("init"; "next: add Markdown files under content/ and run 'mdshelf index'");
    Ok(())
}

/// Create the content directory skeleton with one sample file.
fn create_structure(root: &Path) -> Result<()> {
    let sample_dir = root.join("content").join(SAMPLE_FOLDER);
    fs::create_dir_all(&sample_dir)
        .with_context(|| format!("failed to create directory '{}'", sample_dir.display()))?;

    let sample = sample_dir.join(SAMPLE_FILE);
    if !sample.exists() {
        fs::write(&sample, SAMPLE_CONTENT)
            .with_context(|| format!("failed to write '{}'", sample.display()))?;
    }

    Ok(())
}
