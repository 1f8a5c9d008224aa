//! `[cache]` section configuration.
//!
//! Describes the offline cache generation: its versioned store name, the
//! application shell, and the asset manifest pre-cached at install time.
//!
//! # Example
//!
//! ```toml
//! [cache]
//! offline = true              # false = pass-through mode (no caching at all)
//! name = "mdshelf"            # Store name prefix
//! version = "v1"              # Bump to retire previous cache generations
//! shell = "/index.html"       # Navigation fallback when the network fails
//! sync_tag = "refresh-index"  # Background sync tag that refreshes the index
//! index_path = "/content/index.json"
//! precache = [
//!     "/",
//!     "/index.html",
//!     "/styles.css",
//!     "/app.js",
//! ]
//! ```
//!
//! `offline` is a deploy-time toggle: with `false` the engine only advances
//! its lifecycle state and handles push events, it never opens a store or
//! intercepts a request.

use serde::{Deserialize, Serialize};

/// Offline cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable offline caching. `false` selects the pass-through variant.
    pub offline: bool,

    /// Cache store name prefix.
    pub name: String,

    /// Cache generation version. The store is named `<name>-<version>`;
    /// stores carrying any other name are purged at activation.
    pub version: String,

    /// Application shell path, served when a navigation fetch fails.
    pub shell: String,

    /// Background sync tag that triggers an index refresh.
    pub sync_tag: String,

    /// Origin-relative path of the generated index JSON.
    pub index_path: String,

    /// Origin-relative asset paths fetched and stored at install time.
    pub precache: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            offline: true,
            name: "mdshelf".into(),
            version: "v1".into(),
            shell: "/index.html".into(),
            sync_tag: "refresh-index".into(),
            index_path: "/content/index.json".into(),
            precache: vec![
                "/".into(),
                "/index.html".into(),
                "/styles.css".into(),
                "/app.js".into(),
                "/vendor/marked.min.js".into(),
                "/vendor/highlight.min.js".into(),
                "/vendor/highlight.css".into(),
                "/manifest.webmanifest".into(),
                "/icons/icon-192.png".into(),
                "/icons/icon-512.png".into(),
            ],
        }
    }
}

impl CacheConfig {
    /// Full store name of the current cache generation.
    pub fn store_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}
