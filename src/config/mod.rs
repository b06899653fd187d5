//! Configuration management for `sharecard.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── maps       # [maps], [trips]
//! │   ├── serve      # [serve]
//! │   └── site       # [site]
//! ├── error.rs       # ConfigError, ConfigDiagnostics
//! ├── util.rs        # Config discovery and path helpers
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section    | Purpose                                                 |
//! |------------|---------------------------------------------------------|
//! | `[site]`   | Site mark, URL, locales, template revision, catalog     |
//! | `[build]`  | Asset root, card output, manifest, worker pool          |
//! | `[serve]`  | On-demand render server (interface, port, origin)       |
//! | `[maps]`   | Static map and directions API                           |
//! | `[trips]`  | Shared-trip store and view preference store             |

mod error;
pub mod section;
mod util;

pub use error::{ConfigDiagnostics, ConfigError};
pub use section::{BuildSection, CompositorKind, MapsConfig, ServeConfig, SiteSection, TripsConfig};
pub use util::trim_origin;

use crate::{
    cli::{Cli, Commands},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::{find_config_file, normalize_path};

/// Root configuration structure representing `sharecard.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub maps: MapsConfig,

    #[serde(default)]
    pub trips: TripsConfig,
}

impl SiteConfig {
    /// Load configuration for the given command line.
    ///
    /// Searches upward from cwd for the config file. The project root is the
    /// config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = find_config_file(&cli.config)
            .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        config.config_path = config_path;
        config.root = root.clone();
        config.normalize_paths(&root);
        config.apply_command_options(cli);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .map_err(|err| ConfigError::Toml(path.to_path_buf(), err))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), toml::de::Error> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve every configured path against the project root.
    fn normalize_paths(&mut self, root: &Path) {
        let join = |p: &Path| {
            if p.is_absolute() {
                normalize_path(p)
            } else {
                normalize_path(&root.join(p))
            }
        };
        self.site.content = join(&self.site.content);
        self.build.assets_root = join(&self.build.assets_root);
        self.build.output = join(&self.build.output);
        self.build.manifest = join(&self.build.manifest);
        if let Some(prefs) = self.trips.preferences.as_mut() {
            *prefs = join(prefs);
        }
    }

    /// Command line flags override file values.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build { args } => {
                if let Some(n) = args.concurrency {
                    self.build.concurrency = n;
                }
            }
            Commands::Serve { interface, port } => {
                if let Some(interface) = interface {
                    self.serve.interface = *interface;
                }
                if let Some(port) = port {
                    self.serve.port = *port;
                }
            }
            Commands::Render { compositor, .. } => {
                if let Some(kind) = compositor {
                    self.build.compositor = *kind;
                }
            }
            Commands::Validate | Commands::Meta { .. } => {}
        }
    }

    /// Validate every section, reporting all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        self.site.validate(&mut diag);
        self.build.validate(&mut diag);
        if let Some(origin) = &self.serve.origin
            && url::Url::parse(origin).is_err()
        {
            diag.error("serve.origin", format!("`{origin}` is not an absolute URL"));
        }
        if let Some(endpoint) = &self.trips.endpoint
            && url::Url::parse(endpoint).is_err()
        {
            diag.error("trips.endpoint", format!("`{endpoint}` is not an absolute URL"));
        }
        if self.maps.width == 0 || self.maps.height == 0 {
            diag.error("maps.width", "map panel size must be non-zero");
        }
        diag.into_result()
            .with_context(|| format!("invalid config `{}`", self.config_path.display()))
    }

    /// Site URL without a trailing slash.
    pub fn site_origin(&self) -> &str {
        trim_origin(&self.site.url)
    }

    /// Origin the on-demand compositor fetches fonts and images from.
    pub fn asset_origin(&self) -> &str {
        self.serve
            .origin
            .as_deref()
            .map(trim_origin)
            .unwrap_or_else(|| self.site_origin())
    }

    pub fn is_rtl(&self, locale: &str) -> bool {
        self.site.rtl_locales.iter().any(|l| l == locale)
    }
}

/// Parse a config snippet for section tests.
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
