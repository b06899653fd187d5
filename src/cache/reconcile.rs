//! Manifest merge/replace after a build.

use std::{collections::BTreeMap, fs, io, path::Path};

use rustc_hash::FxHashSet;

use super::manifest::{ManifestEntry, ManifestFile};
use crate::debug;

/// Resulting entry set plus the number of asset files deleted.
#[derive(Debug)]
pub struct Reconciled {
    pub entries: BTreeMap<String, ManifestEntry>,
    pub removed: usize,
}

/// Filtered build: out-of-filter entries stay untouched, in-filter entries
/// are overwritten, and an in-filter key whose asset changed has its old file
/// deleted.
pub fn merge(
    previous: Option<&ManifestFile>,
    fresh: BTreeMap<String, ManifestEntry>,
    assets_dir: &Path,
) -> io::Result<Reconciled> {
    let mut entries = previous.map(|m| m.entries.clone()).unwrap_or_default();
    let mut removed = 0;

    for (key, entry) in fresh {
        if let Some(old) = entries.get(&key)
            && old.asset_path != entry.asset_path
            && let Some(name) = old.file_name()
        {
            removed += usize::from(remove_asset(&assets_dir.join(name))?);
        }
        entries.insert(key, entry);
    }

    Ok(Reconciled { entries, removed })
}

/// Full build: the fresh set replaces the manifest and every `.png` in the
/// assets directory it does not reference is deleted.
pub fn replace(fresh: BTreeMap<String, ManifestEntry>, assets_dir: &Path) -> io::Result<Reconciled> {
    let referenced: FxHashSet<&str> = fresh.values().filter_map(ManifestEntry::file_name).collect();
    let mut removed = 0;

    let dir = match fs::read_dir(assets_dir) {
        Ok(dir) => dir,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(Reconciled { entries: fresh, removed });
        }
        Err(err) => return Err(err),
    };

    for entry in dir {
        let path = entry?.path();
        let is_png = path.extension().is_some_and(|ext| ext == "png");
        let name = path.file_name().and_then(|n| n.to_str());
        if is_png && path.is_file() && name.is_some_and(|n| !referenced.contains(n)) {
            removed += usize::from(remove_asset(&path)?);
        }
    }

    Ok(Reconciled { entries: fresh, removed })
}

fn remove_asset(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("cache"; "removed {}", path.display());
            Ok(true)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(key: &str, hash: &str) -> (String, ManifestEntry) {
        (
            key.to_string(),
            ManifestEntry {
                route_key: key.into(),
                asset_path: format!("/og/{key}-{hash}.png"),
                content_hash: hash.into(),
            },
        )
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"png").unwrap();
    }

    #[test]
    fn test_merge_keeps_out_of_filter_entries() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "root-aaaa.png");
        touch(dir.path(), "de-features-bbbb.png");
        touch(dir.path(), "de-features-cccc.png");

        let previous = ManifestFile::new([entry("root", "aaaa"), entry("de-features", "bbbb")].into());
        let fresh = [entry("de-features", "cccc")].into();

        let result = merge(Some(&previous), fresh, dir.path()).unwrap();
        assert_eq!(result.removed, 1);
        assert_eq!(result.entries["root"], previous.entries["root"]);
        assert_eq!(result.entries["de-features"].content_hash, "cccc");
        assert!(dir.path().join("root-aaaa.png").exists());
        assert!(!dir.path().join("de-features-bbbb.png").exists());
    }

    #[test]
    fn test_merge_without_previous() {
        let dir = TempDir::new().unwrap();
        let result = merge(None, [entry("root", "aaaa")].into(), dir.path()).unwrap();
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.removed, 0);
    }

    #[test]
    fn test_replace_removes_unreferenced_pngs() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "root-aaaa.png");
        touch(dir.path(), "stale-0000.png");
        touch(dir.path(), "notes.txt");

        let result = replace([entry("root", "aaaa")].into(), dir.path()).unwrap();
        assert_eq!(result.removed, 1);
        assert!(dir.path().join("root-aaaa.png").exists());
        assert!(!dir.path().join("stale-0000.png").exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_replace_missing_dir() {
        let dir = TempDir::new().unwrap();
        let result = replace(BTreeMap::new(), &dir.path().join("og")).unwrap();
        assert_eq!(result.removed, 0);
    }
}
