//! Diff targets against the card cache.

use std::collections::BTreeMap;

use super::targets::Target;
use crate::{
    cache::{ManifestEntry, content_hash, file_name},
    config::SiteConfig,
    render::RenderPayload,
};

/// A card that has to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTask {
    pub route_key: String,
    pub file_name: String,
    /// Payload as query pairs, the same shape the `/og` endpoint takes.
    pub query: Vec<(String, String)>,
}

#[derive(Debug, Default)]
pub struct Plan {
    /// Manifest entries for every target, rendered or reused.
    pub entries: BTreeMap<String, ManifestEntry>,
    pub tasks: Vec<RenderTask>,
    pub reused: usize,
}

/// Payload and digest for one target.
pub fn fingerprint(target: &Target, config: &SiteConfig) -> (RenderPayload, String) {
    let payload = RenderPayload::from_metadata(&target.meta);
    let digest = content_hash(&payload, &config.site.template_revision);
    (payload, digest)
}

/// A target is reused iff its exact content-addressed file already exists.
pub fn diff(targets: &[Target], config: &SiteConfig) -> Plan {
    let mut plan = Plan::default();

    for target in targets {
        let (payload, digest) = fingerprint(target, config);
        let name = file_name(target.route_key(), &digest);

        if config.build.output.join(&name).is_file() {
            plan.reused += 1;
        } else {
            plan.tasks.push(RenderTask {
                route_key: target.route_key().to_string(),
                file_name: name.clone(),
                query: payload.to_query(),
            });
        }

        plan.entries.insert(
            target.route_key().to_string(),
            ManifestEntry {
                route_key: target.route_key().to_string(),
                asset_path: config.build.asset_url(&name),
                content_hash: digest,
            },
        );
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{batch::targets::enumerate, config::test_parse_config, content::test_catalog};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_existing_files_are_reused() {
        let dir = TempDir::new().unwrap();
        let mut config = test_parse_config("[site]\nlocales = [\"en\", \"de\"]");
        config.build.output = dir.path().to_path_buf();

        let targets = enumerate(&config, &test_catalog());
        let plan = diff(&targets, &config);
        assert_eq!(plan.tasks.len(), targets.len());
        assert_eq!(plan.entries.len(), targets.len());
        assert_eq!(plan.reused, 0);

        let root = &plan.entries["root"];
        assert!(root.asset_path.starts_with("/og/root-"));
        fs::write(dir.path().join(root.file_name().unwrap()), b"png").unwrap();

        let plan = diff(&targets, &config);
        assert_eq!(plan.reused, 1);
        assert!(plan.tasks.iter().all(|t| t.route_key != "root"));
    }

    #[test]
    fn test_task_carries_payload() {
        let config = test_parse_config("[site]\nlocales = [\"en\", \"de\"]");
        let targets = enumerate(&config, &test_catalog());
        let plan = diff(&targets, &config);

        let task = plan.tasks.iter().find(|t| t.route_key == "de-features").unwrap();
        let payload = RenderPayload::from_query(&task.query);
        assert_eq!(payload.title, "Funktionen");
        assert_eq!(payload.pill, "Produkt");
        assert_eq!(payload.path, "/de/features");
    }
}
