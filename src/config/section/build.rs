//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! assets_root = "public"          # Static assets (fonts, blog images), served during batch builds
//! output = "public/og"            # Generated card directory
//! public_prefix = "/og"           # URL prefix of generated cards
//! manifest = "og-manifest.json"   # Manifest file
//! concurrency = 4                 # Render workers (clamped to 1..=16)
//! compositor = "vector"           # "vector" or "on-demand"
//! fonts = ["fonts/Inter-Regular.ttf", "fonts/Inter-Bold.ttf"]
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Upper bound for render workers.
pub const MAX_CONCURRENCY: usize = 16;

/// Which compositor renders batch targets.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CompositorKind {
    /// Vector-only, local fonts, no network.
    #[default]
    Vector,
    /// Fetches fonts and images from the local asset server.
    OnDemand,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    pub assets_root: PathBuf,
    pub output: PathBuf,
    pub public_prefix: String,
    pub manifest: PathBuf,
    pub concurrency: usize,
    pub compositor: CompositorKind,
    /// Font files, relative to `assets_root`.
    pub fonts: Vec<String>,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from("public"),
            output: PathBuf::from("public/og"),
            public_prefix: "/og".into(),
            manifest: PathBuf::from("og-manifest.json"),
            concurrency: 4,
            compositor: CompositorKind::Vector,
            fonts: vec!["fonts/Inter-Regular.ttf".into(), "fonts/Inter-Bold.ttf".into()],
        }
    }
}

impl BuildSection {
    /// Worker count clamped into the safe range.
    pub fn workers(&self) -> usize {
        self.concurrency.clamp(1, MAX_CONCURRENCY)
    }

    /// Public URL path of a generated asset.
    pub fn asset_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_prefix.trim_end_matches('/'), file_name)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.public_prefix.starts_with('/') {
            diag.error_with_hint(
                "build.public_prefix",
                format!("`{}` must start with `/`", self.public_prefix),
                "e.g. \"/og\"",
            );
        }
        if self.concurrency == 0 {
            diag.error("build.concurrency", "must be at least 1");
        }
        if self.fonts.iter().any(|f| f.contains("..")) {
            diag.error("build.fonts", "font paths must stay inside assets_root");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_build_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.workers(), 4);
        assert_eq!(config.build.compositor, CompositorKind::Vector);
        assert_eq!(config.build.asset_url("root-abc.png"), "/og/root-abc.png");
    }

    #[test]
    fn test_workers_clamped() {
        let config = test_parse_config("[build]\nconcurrency = 64");
        assert_eq!(config.build.workers(), MAX_CONCURRENCY);
    }

    #[test]
    fn test_compositor_parsing() {
        let config = test_parse_config("[build]\ncompositor = \"on-demand\"");
        assert_eq!(config.build.compositor, CompositorKind::OnDemand);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = test_parse_config("[build]\nconcurrency = 0\npublic_prefix = \"og\"");
        let mut diag = ConfigDiagnostics::new();
        config.build.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
