//! Manifest validation (read-only CI gate).
//!
//! Recomputes the full target set and every digest, then compares against
//! the manifest and the files on disk. Nothing is written.

mod report;

use anyhow::{Result, bail};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::{
    batch::{enumerate, fingerprint},
    cache::{ManifestError, ManifestFile, file_name},
    config::SiteConfig,
    content::ContentCatalog,
    log,
    utils::fmt::plural_count,
};

pub use report::{Section, ValidationReport};

/// Validate the manifest and exit non-zero on any mismatch.
pub fn validate_manifest(config: &SiteConfig) -> Result<()> {
    let catalog = ContentCatalog::load(&config.site.content)?;
    log!("validate"; "checking {}", config.build.manifest.display());

    let report = check(config, &catalog);
    report.print();
    log!("validate"; "{}", report);

    if !report.is_ok() {
        bail!("manifest validation failed");
    }
    Ok(())
}

/// Compare the manifest against a fresh computation.
pub fn check(config: &SiteConfig, catalog: &ContentCatalog) -> ValidationReport {
    let mut report = ValidationReport::default();
    let manifest_path = &config.build.manifest;

    let manifest = match ManifestFile::read(manifest_path) {
        Ok(manifest) => manifest,
        Err(ManifestError::Shape { problems, .. }) => {
            for problem in problems {
                report.add(Section::Manifest, "shape", problem);
            }
            return report;
        }
        Err(err) => {
            report.add(Section::Manifest, manifest_path.display().to_string(), err.to_string());
            return report;
        }
    };

    let expected_revision = manifest.compute_revision();
    if manifest.revision != expected_revision {
        report.add(
            Section::Manifest,
            "revision",
            format!("is `{}`, entries hash to `{}`", manifest.revision, expected_revision),
        );
    }

    let targets = enumerate(config, catalog);
    log!("validate"; "recomputing {}", plural_count(targets.len(), "target"));
    let fresh: FxHashMap<String, String> = targets
        .par_iter()
        .map(|t| (t.route_key().to_string(), fingerprint(t, config).1))
        .collect();

    let mut missing: Vec<&String> = fresh.keys().filter(|k| !manifest.entries.contains_key(*k)).collect();
    missing.sort();
    for key in missing {
        report.add(Section::Routes, key.as_str(), "missing from manifest");
    }

    for (key, entry) in &manifest.entries {
        let Some(digest) = fresh.get(key) else {
            report.add(Section::Routes, key.as_str(), "not a current route");
            continue;
        };
        if &entry.content_hash != digest {
            report.add(
                Section::Digests,
                key.as_str(),
                format!("recorded `{}`, expected `{}`", entry.content_hash, digest),
            );
        } else if entry.asset_path != config.build.asset_url(&file_name(key, digest)) {
            report.add(Section::Digests, key.as_str(), format!("unexpected asset path `{}`", entry.asset_path));
        }
    }

    let mut absent: Vec<(&str, &str)> = manifest
        .entries
        .par_iter()
        .filter(|(_, entry)| {
            !entry
                .file_name()
                .is_some_and(|name| config.build.output.join(name).is_file())
        })
        .map(|(key, entry)| (key.as_str(), entry.asset_path.as_str()))
        .collect();
    absent.sort_unstable();
    for (key, path) in absent {
        report.add(Section::Assets, key, format!("`{path}` not found"));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{batch::{TargetFilter, run}, config::test_parse_config, content::test_catalog, render::Compositor};
    use image::{Rgba, RgbaImage};
    use std::{fs, path::Path};
    use tempfile::TempDir;

    struct Blank;

    impl Compositor for Blank {
        fn render(&self, _: &crate::render::RenderPayload) -> Result<RgbaImage, crate::render::RenderError> {
            Ok(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255])))
        }
    }

    fn built(root: &Path) -> SiteConfig {
        let mut config = test_parse_config("[site]\nlocales = [\"en\", \"de\"]");
        config.build.assets_root = root.join("public");
        config.build.output = root.join("public/og");
        config.build.manifest = root.join("og-manifest.json");
        run(&config, &test_catalog(), &TargetFilter::default(), |_| {
            let c: Box<dyn Compositor> = Box::new(Blank);
            Ok(c)
        })
        .unwrap();
        config
    }

    #[test]
    fn test_fresh_build_passes() {
        let dir = TempDir::new().unwrap();
        let config = built(dir.path());
        let report = check(&config, &test_catalog());
        assert!(report.is_ok(), "{report:?}");
    }

    #[test]
    fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let mut config = test_parse_config("");
        config.build.manifest = dir.path().join("none.json");
        let report = check(&config, &test_catalog());
        assert_eq!(report.errors(Section::Manifest).len(), 1);
    }

    #[test]
    fn test_content_change_is_detected() {
        let dir = TempDir::new().unwrap();
        let config = built(dir.path());

        let mut catalog = test_catalog();
        catalog.pages[1].copy.get_mut("en").unwrap().title = "All features".into();
        catalog.blog.clear();

        let report = check(&config, &catalog);
        assert_eq!(report.errors(Section::Digests).len(), 1);
        assert_eq!(report.errors(Section::Digests)[0].target, "features");
        let extra: Vec<_> = report.errors(Section::Routes).iter().map(|e| e.target.as_str()).collect();
        assert_eq!(extra, ["blog-packing-list", "de-blog-wanderwege"]);
    }

    #[test]
    fn test_tampering_is_detected() {
        let dir = TempDir::new().unwrap();
        let config = built(dir.path());

        let mut manifest = ManifestFile::read(&config.build.manifest).unwrap();
        let root = manifest.entries["root"].clone();
        fs::remove_file(config.build.output.join(root.file_name().unwrap())).unwrap();
        manifest.entries.remove("de");
        manifest.write(&config.build.manifest).unwrap();

        let report = check(&config, &test_catalog());
        assert_eq!(report.errors(Section::Manifest)[0].target, "revision");
        assert_eq!(report.errors(Section::Routes)[0].target, "de");
        assert_eq!(report.errors(Section::Assets)[0].target, "root");
    }
}
