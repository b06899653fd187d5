//! URL to filesystem path resolution.

use std::path::{Path, PathBuf};

/// Resolve a request URL to a file under `serve_root`.
///
/// Only regular files are served. Anything that escapes the root after
/// decoding or symlink resolution is rejected.
pub fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url);

    if clean.is_empty() || clean.split('/').any(|seg| seg == "..") || clean.contains('\\') {
        return None;
    }

    let local = serve_root.join(&clean);

    let canonical = local.canonicalize().ok()?;
    let root_canonical = serve_root.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    canonical.is_file().then_some(canonical)
}

/// Normalize URL: decode, strip query string, trim slashes
fn normalize_url(url: &str) -> String {
    use percent_encoding::percent_decode_str;
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    decoded.trim_matches('/').to_string()
}
