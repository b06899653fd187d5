//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! name = "Wayfarer"
//! url = "https://wayfarer.example"
//! default_locale = "en"
//! locales = ["en", "de", "fr", "ar"]
//! rtl_locales = ["ar"]
//! default_description = "Plan trips together."
//! template_revision = "3"
//! content = "content.toml"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Site identity, locales and the share-card template revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Site mark rendered in the card footer.
    pub name: String,

    /// Absolute site URL used for canonical and alternate links.
    pub url: String,

    /// Locale whose paths carry no prefix.
    pub default_locale: String,

    /// Every supported locale, default included.
    pub locales: Vec<String>,

    /// Locales rendered right-to-left (kept dynamic, never precomputed).
    pub rtl_locales: Vec<String>,

    /// Description used when a route has no copy of its own.
    pub default_description: String,

    /// Bumped whenever the card layout changes; part of every content hash.
    pub template_revision: String,

    /// Content catalog (pages, blog posts, countries, examples).
    pub content: PathBuf,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            name: "Wayfarer".into(),
            url: "http://localhost:5280".into(),
            default_locale: "en".into(),
            locales: vec!["en".into()],
            rtl_locales: vec!["ar".into(), "fa".into(), "he".into(), "ur".into()],
            default_description: "Plan, share and relive your trips.".into(),
            template_revision: "1".into(),
            content: PathBuf::from("content.toml"),
        }
    }
}

impl SiteSection {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if url::Url::parse(&self.url).is_err() {
            diag.error_with_hint(
                "site.url",
                format!("`{}` is not an absolute URL", self.url),
                "use a full URL such as \"https://example.com\"",
            );
        }
        if self.locales.is_empty() {
            diag.error("site.locales", "at least one locale is required");
        }
        if !self.locales.contains(&self.default_locale) {
            diag.error_with_hint(
                "site.default_locale",
                format!("`{}` is not listed in site.locales", self.default_locale),
                "add it to site.locales",
            );
        }
        if let Some(bad) = self
            .locales
            .iter()
            .find(|l| l.is_empty() || !l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'))
        {
            diag.error("site.locales", format!("`{bad}` is not a valid locale code"));
        }
        if self.template_revision.trim().is_empty() {
            diag.error("site.template_revision", "must not be empty");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_site_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.site.default_locale, "en");
        assert_eq!(config.site.locales, vec!["en"]);
        assert!(config.site.rtl_locales.contains(&"ar".to_string()));
    }

    #[test]
    fn test_site_default_locale_must_be_listed() {
        let config = test_parse_config("[site]\ndefault_locale = \"fr\"\nlocales = [\"en\", \"de\"]");
        let mut diag = ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field, "site.default_locale");
    }

    #[test]
    fn test_site_rejects_relative_url() {
        let config = test_parse_config("[site]\nurl = \"example.com\"");
        let mut diag = ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert!(diag.errors().iter().any(|e| e.field == "site.url"));
    }
}
