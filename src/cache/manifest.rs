//! Manifest file: route key → generated card.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::digest::{is_digest, revision};
use crate::utils::date::DateTimeUtc;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest `{0}` not found")]
    Missing(PathBuf),

    #[error("failed to access `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("`{0}` is not a valid manifest")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("`{path}` has an invalid shape: {}", .problems.join("; "))]
    Shape { path: PathBuf, problems: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub route_key: String,
    /// Public URL path, e.g. `/og/de-features-0123456789abcdef.png`.
    pub asset_path: String,
    pub content_hash: String,
}

impl ManifestEntry {
    /// File name part of the asset path.
    pub fn file_name(&self) -> Option<&str> {
        let name = self.asset_path.rsplit('/').next()?;
        (!name.is_empty() && name != ".." && name != "." && !name.contains('\\')).then_some(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestFile {
    pub generated_at: String,
    pub revision: String,
    pub entries: BTreeMap<String, ManifestEntry>,
}

impl ManifestFile {
    /// Fresh manifest stamped with the current time.
    pub fn new(entries: BTreeMap<String, ManifestEntry>) -> Self {
        let revision = compute_revision(&entries);
        Self {
            generated_at: DateTimeUtc::now().to_rfc3339(),
            revision,
            entries,
        }
    }

    pub fn compute_revision(&self) -> String {
        compute_revision(&self.entries)
    }

    /// Read a manifest, `None` if the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, ManifestError> {
        match Self::read(path) {
            Ok(manifest) => Ok(Some(manifest)),
            Err(ManifestError::Missing(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Read and shape-check a manifest.
    pub fn read(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                ManifestError::Missing(path.to_path_buf())
            } else {
                ManifestError::Io(path.to_path_buf(), err)
            }
        })?;
        let value: Value = serde_json::from_str(&content)
            .map_err(|err| ManifestError::Json(path.to_path_buf(), err))?;

        let problems = shape_problems(&value);
        if !problems.is_empty() {
            return Err(ManifestError::Shape {
                path: path.to_path_buf(),
                problems,
            });
        }
        serde_json::from_value(value).map_err(|err| ManifestError::Json(path.to_path_buf(), err))
    }

    /// Write pretty JSON through a temp file and rename.
    pub fn write(&self, path: &Path) -> Result<(), ManifestError> {
        let io_err = |err| ManifestError::Io(path.to_path_buf(), err);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut json = serde_json::to_string_pretty(self)
            .map_err(|err| ManifestError::Json(path.to_path_buf(), err))?;
        json.push('\n');

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)
    }
}

fn compute_revision(entries: &BTreeMap<String, ManifestEntry>) -> String {
    revision(entries.values().map(|e| {
        (
            e.route_key.as_str(),
            e.asset_path.as_str(),
            e.content_hash.as_str(),
        )
    }))
}

/// Structural problems with a parsed manifest, empty when well formed.
pub fn shape_problems(value: &Value) -> Vec<String> {
    let mut problems = Vec::new();
    let Some(root) = value.as_object() else {
        return vec!["top level is not an object".into()];
    };

    if !root.get("generatedAt").is_some_and(Value::is_string) {
        problems.push("`generatedAt` must be a string".into());
    }
    match root.get("revision").and_then(Value::as_str) {
        Some(rev) if is_digest(rev) => {}
        _ => problems.push("`revision` must be a 16-char hex digest".into()),
    }

    let Some(entries) = root.get("entries").and_then(Value::as_object) else {
        problems.push("`entries` must be an object".into());
        return problems;
    };

    for (key, entry) in entries {
        let Some(entry) = entry.as_object() else {
            problems.push(format!("entry `{key}` is not an object"));
            continue;
        };
        let field = |name: &str| entry.get(name).and_then(Value::as_str);

        match field("routeKey") {
            Some(route_key) if route_key == key => {}
            Some(route_key) => problems.push(format!("entry `{key}` has routeKey `{route_key}`")),
            None => problems.push(format!("entry `{key}` is missing `routeKey`")),
        }
        match field("assetPath") {
            Some(path) if path.starts_with('/') && path.ends_with(".png") => {}
            Some(path) => problems.push(format!("entry `{key}` has invalid assetPath `{path}`")),
            None => problems.push(format!("entry `{key}` is missing `assetPath`")),
        }
        match field("contentHash") {
            Some(hash) if is_digest(hash) => {}
            Some(hash) => problems.push(format!("entry `{key}` has invalid contentHash `{hash}`")),
            None => problems.push(format!("entry `{key}` is missing `contentHash`")),
        }
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(key: &str, hash: &str) -> ManifestEntry {
        ManifestEntry {
            route_key: key.into(),
            asset_path: format!("/og/{key}-{hash}.png"),
            content_hash: hash.into(),
        }
    }

    fn manifest() -> ManifestFile {
        let entries = [entry("root", "0123456789abcdef"), entry("de-features", "fedcba9876543210")]
            .into_iter()
            .map(|e| (e.route_key.clone(), e))
            .collect();
        ManifestFile::new(entries)
    }

    #[test]
    fn test_write_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/og-manifest.json");
        let manifest = manifest();
        manifest.write(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"generatedAt\""));
        assert!(raw.contains("\"routeKey\": \"de-features\""));
        // Sorted by key.
        assert!(raw.find("de-features").unwrap() < raw.find("\"root\"").unwrap());
        assert!(!path.with_extension("json.tmp").exists());

        assert_eq!(ManifestFile::read(&path).unwrap(), manifest);
    }

    #[test]
    fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("none.json");
        assert!(ManifestFile::load(&path).unwrap().is_none());
        assert!(matches!(ManifestFile::read(&path), Err(ManifestError::Missing(_))));
    }

    #[test]
    fn test_shape_problems() {
        let value = serde_json::json!({
            "generatedAt": "2025-01-01T00:00:00Z",
            "revision": "XYZ",
            "entries": {
                "root": { "routeKey": "home", "assetPath": "og/root.jpg", "contentHash": "0123456789abcdef" },
                "de": { "routeKey": "de", "assetPath": "/og/de.png" },
                "bad": 3
            }
        });
        let problems = shape_problems(&value);
        assert_eq!(problems.len(), 5, "{problems:#?}");
        assert!(shape_problems(&serde_json::to_value(manifest()).unwrap()).is_empty());
        assert_eq!(shape_problems(&serde_json::json!([])).len(), 1);
    }

    #[test]
    fn test_entry_file_name() {
        assert_eq!(entry("root", "0123456789abcdef").file_name(), Some("root-0123456789abcdef.png"));
        let traversal = ManifestEntry { asset_path: "/og/..".into(), ..entry("x", "0") };
        assert_eq!(traversal.file_name(), None);
    }
}
