//! Path utilities: normalization, hidden-name checks, URL-to-file resolution.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Check whether a file or directory name starts with a dot.
#[inline]
pub fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

/// Resolve a URL path to a file under `root`, handling `index.html` for
/// directories.
///
/// Percent-decodes the path, drops any query string, and canonicalizes the
/// result to verify it stays under `root` (rejects traversal via `..` or
/// symlinks).
pub fn resolve_under_root(root: &Path, url_path: &str) -> Option<PathBuf> {
    let clean = normalize_url_path(url_path);

    if clean.contains("..") {
        return None;
    }

    let local = root.join(&clean);

    let canonical = local.canonicalize().ok()?;
    let root_canonical = root.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }

    None
}

/// Normalize a URL path: decode, strip query string, trim slashes.
fn normalize_url_path(url_path: &str) -> String {
    use percent_encoding::percent_decode_str;
    let decoded = percent_decode_str(url_path)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    let path = decoded.split('?').next().unwrap_or(&decoded);
    path.trim_matches('/').to_string()
}
