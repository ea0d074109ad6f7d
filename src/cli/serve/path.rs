//! URL to filesystem path resolution.

use std::path::{Path, PathBuf};

/// Directory index files, in lookup order.
const INDEX_FILES: &[&str] = &["index.html", "index.htm"];

/// Resolve URL to filesystem path, handling index files for directories
pub fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url);

    // Reject paths with suspicious patterns early
    if clean.split('/').any(|segment| segment == "..") {
        return None;
    }

    // Canonicalize to resolve symlinks and verify path is under serve_root
    let canonical = serve_root.join(&clean).canonicalize().ok()?;
    let root_canonical = serve_root.canonicalize().ok()?;
    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    if canonical.is_dir() {
        return INDEX_FILES
            .iter()
            .map(|name| canonical.join(name))
            .find(|index| index.is_file());
    }

    None
}

/// Normalize URL: strip query string and fragment, decode, trim slashes
fn normalize_url(url: &str) -> String {
    use percent_encoding::percent_decode_str;

    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    decoded.trim_matches('/').to_string()
}
