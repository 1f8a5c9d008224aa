//! MIME type detection for the preview server and site fetcher.
//!
//! Trimmed to the asset surface of a Markdown reading app: the HTML shell,
//! stylesheets, script bundles, the PWA manifest, icons, and content files.

use std::path::Path;

/// Common MIME type constants.
pub mod types {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const JSON: &str = "application/json";
    pub const MARKDOWN: &str = "text/markdown; charset=utf-8";
    pub const MANIFEST: &str = "application/manifest+json";
    pub const XML: &str = "application/xml";

    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";
    pub const WEBP: &str = "image/webp";

    pub const WOFF2: &str = "font/woff2";
    pub const WOFF: &str = "font/woff";

    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Guess MIME type from a file path's extension.
///
/// Returns a full MIME type string suitable for an HTTP Content-Type header.
pub fn from_path(path: &Path) -> &'static str {
    from_extension(path.extension().and_then(|e| e.to_str()))
}

/// Guess MIME type from an extension string.
pub fn from_extension(ext: Option<&str>) -> &'static str {
    match ext {
        Some("html" | "htm") => types::HTML,
        Some("css") => types::CSS,
        Some("js" | "mjs" | "cjs") => types::JAVASCRIPT,
        Some("json") => types::JSON,
        Some("md" | "markdown") => types::MARKDOWN,
        Some("webmanifest") => types::MANIFEST,
        Some("xml") => types::XML,
        Some("txt") => types::PLAIN,

        Some("png") => types::PNG,
        Some("jpg" | "jpeg") => types::JPEG,
        Some("svg") => types::SVG,
        Some("ico") => types::ICO,
        Some("webp") => types::WEBP,

        Some("woff2") => types::WOFF2,
        Some("woff") => types::WOFF,

        _ => types::OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_path() {
        assert_eq!(from_path(&PathBuf::from("index.html")), types::HTML);
        assert_eq!(from_path(&PathBuf::from("styles.css")), types::CSS);
        assert_eq!(from_path(&PathBuf::from("app.js")), types::JAVASCRIPT);
        assert_eq!(from_path(&PathBuf::from("index.json")), types::JSON);
        assert_eq!(from_path(&PathBuf::from("01-intro.md")), types::MARKDOWN);
        assert_eq!(
            from_path(&PathBuf::from("manifest.webmanifest")),
            types::MANIFEST
        );
        assert_eq!(from_path(&PathBuf::from("icon-192.png")), types::PNG);
        assert_eq!(from_path(&PathBuf::from("unknown.xyz")), types::OCTET_STREAM);
    }

    #[test]
    fn test_from_extension_none() {
        assert_eq!(from_extension(None), types::OCTET_STREAM);
    }
}
