//! Metadata resolver: `(path, query) → CanonicalMetadata`.
//!
//! Pure and total. Unknown locales fall back to the default locale and unknown
//! paths to generic, non-indexable metadata.

mod locale;
mod route;

pub use locale::{TextDirection, localize, normalize_path, split_locale};
pub use route::RouteKind;

use serde::Serialize;

use crate::{
    config::SiteConfig,
    content::ContentCatalog,
    utils::slug::slugify,
};
use route::{RouteCtx, lookup};

/// Query keys that select a distinct rendered output.
pub const STABLE_QUERY_KEYS: [&str; 3] = ["share", "template", "trip"];

/// Everything the metadata contributes to pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageParams {
    pub title: String,
    pub description: String,
    pub pill: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tint_intensity: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlternateLink {
    pub hreflang: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalMetadata {
    pub route_key: String,
    pub canonical_path: String,
    pub canonical_url: String,
    pub title: String,
    pub description: String,
    pub og_title: String,
    pub og_description: String,
    pub image_params: ImageParams,
    pub alternate_links: Vec<AlternateLink>,
    pub locale: String,
    pub html_lang: String,
    /// Locale whose copy the canonical page and its share image use.
    pub content_locale: String,
    pub text_direction: TextDirection,
    pub robots_policy: &'static str,
    pub kind: RouteKind,
}

/// Resolver bound to one site configuration and content catalog.
pub struct Resolver<'a> {
    config: &'a SiteConfig,
    catalog: &'a ContentCatalog,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a SiteConfig, catalog: &'a ContentCatalog) -> Self {
        Self { config, catalog }
    }

    /// Resolve a request path plus its query pairs.
    pub fn resolve(&self, path: &str, query: &[(String, String)]) -> CanonicalMetadata {
        let site = &self.config.site;
        let normalized = normalize_path(path);
        let split = split_locale(&normalized, site);
        let def = lookup(&RouteCtx {
            site,
            catalog: self.catalog,
            base: &split.base,
        });

        let content_locale = if def.kind.is_localized() || def.localized_canonical {
            if def.has_copy(&split.locale) {
                split.locale.clone()
            } else {
                def.source_locale.clone()
            }
        } else {
            site.default_locale.clone()
        };

        let canonical_path = localize(&split.base, &content_locale, site);
        let origin = self.config.site_origin();

        let alternate_links = if def.kind.is_localized() || def.localized_canonical {
            def.locales
                .iter()
                .map(|l| AlternateLink {
                    hreflang: l.clone(),
                    href: format!("{origin}{}", localize(&split.base, l, site)),
                })
                .chain(std::iter::once(AlternateLink {
                    hreflang: "x-default".into(),
                    href: format!("{origin}{}", localize(&split.base, &def.source_locale, site)),
                }))
                .collect()
        } else {
            vec![AlternateLink {
                hreflang: "x-default".into(),
                href: format!("{origin}{canonical_path}"),
            }]
        };

        let labels = self.catalog.labels(&content_locale, &site.default_locale);
        let section_pill = |kind: RouteKind| match kind {
            RouteKind::Blog => labels.blog.clone(),
            RouteKind::Country => labels.country.clone(),
            RouteKind::Example => labels.example.clone(),
            RouteKind::Inspirations => labels.inspirations.clone(),
            _ => site.name.clone(),
        };

        let page_copy = def.copy_for(&split.locale);
        let image_copy = def.copy_for(&content_locale);

        let image_params = ImageParams {
            title: image_copy.title.clone(),
            description: non_empty(&image_copy.description, &site.default_description),
            pill: image_copy.pill.clone().unwrap_or_else(|| section_pill(def.kind)),
            path: canonical_path.clone(),
            blog_image: def.image.clone(),
            tint: def.tint.clone(),
            tint_intensity: def.tint_intensity,
        };

        let description = non_empty(&page_copy.description, &site.default_description);
        let title = if canonical_path == "/" || page_copy.title == site.name {
            page_copy.title.clone()
        } else {
            format!("{} | {}", page_copy.title, site.name)
        };

        CanonicalMetadata {
            route_key: route_key(&canonical_path, query),
            canonical_url: format!("{origin}{canonical_path}"),
            canonical_path,
            title,
            og_title: page_copy.title.clone(),
            og_description: description.clone(),
            description,
            image_params,
            alternate_links,
            html_lang: locale::html_lang(&split.locale),
            text_direction: locale::direction(&split.locale, site),
            locale: split.locale,
            content_locale,
            robots_policy: if def.indexable { "index, follow" } else { "noindex, follow" },
            kind: def.kind,
        }
    }
}

/// Slug of the canonical path plus the stable query subset, sorted by key.
pub fn route_key(canonical_path: &str, query: &[(String, String)]) -> String {
    let mut stable: Vec<&(String, String)> = query
        .iter()
        .filter(|(k, v)| STABLE_QUERY_KEYS.contains(&k.as_str()) && !v.is_empty())
        .collect();
    stable.sort();

    if stable.is_empty() {
        return slugify(canonical_path);
    }
    let suffix: Vec<String> = stable.iter().map(|(k, v)| format!("{k}={v}")).collect();
    slugify(&format!("{canonical_path}?{}", suffix.join("&")))
}

fn non_empty(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::test_parse_config, content::test_catalog};

    fn config() -> SiteConfig {
        test_parse_config(
            "[site]\nname = \"Wayfarer\"\nurl = \"https://wayfarer.example\"\nlocales = [\"en\", \"de\", \"ar\"]",
        )
    }

    #[test]
    fn test_root_resolves_to_root_key() {
        let config = config();
        let catalog = test_catalog();
        let meta = Resolver::new(&config, &catalog).resolve("/", &[]);
        assert_eq!(meta.route_key, "root");
        assert_eq!(meta.canonical_path, "/");
        assert_eq!(meta.canonical_url, "https://wayfarer.example/");
        assert_eq!(meta.robots_policy, "index, follow");
    }

    #[test]
    fn test_localized_marketing_page() {
        let config = config();
        let catalog = test_catalog();
        let meta = Resolver::new(&config, &catalog).resolve("/de/features", &[]);
        assert_eq!(meta.canonical_path, "/de/features");
        assert_eq!(meta.html_lang, "de");
        assert_eq!(meta.route_key, "de-features");
        assert_eq!(meta.image_params.title, "Funktionen");
        assert_eq!(meta.image_params.pill, "Produkt");
        assert!(meta.alternate_links.iter().any(|l| l.hreflang == "de"
            && l.href == "https://wayfarer.example/de/features"));
        assert!(meta
            .alternate_links
            .iter()
            .any(|l| l.hreflang == "x-default" && l.href == "https://wayfarer.example/features"));
    }

    #[test]
    fn test_missing_copy_canonicalizes_to_source_locale() {
        let config = config();
        let catalog = test_catalog();
        let meta = Resolver::new(&config, &catalog).resolve("/de/blog/packing-list", &[]);
        assert_eq!(meta.locale, "de");
        assert_eq!(meta.content_locale, "en");
        assert_eq!(meta.canonical_path, "/blog/packing-list");
        assert_eq!(meta.alternate_links.len(), 2);
        assert_eq!(meta.image_params.blog_image.as_deref(), Some("/images/blog/packing-list.jpg"));
        assert_eq!(meta.image_params.pill, "Blog");
    }

    #[test]
    fn test_tool_route_shares_one_image() {
        let config = config();
        let catalog = test_catalog();
        let resolver = Resolver::new(&config, &catalog);
        let en = resolver.resolve("/planner", &[]);
        let de = resolver.resolve("/de/planner/", &[]);
        assert_eq!(de.canonical_path, "/planner");
        assert_eq!(en.route_key, de.route_key);
        assert_eq!(en.image_params, de.image_params);
        assert_eq!(de.og_title, "Reiseplaner");
    }

    #[test]
    fn test_unknown_path_falls_back() {
        let config = config();
        let catalog = test_catalog();
        let meta = Resolver::new(&config, &catalog).resolve("/fr/some-page", &[]);
        assert_eq!(meta.locale, "en");
        assert_eq!(meta.og_title, "Some Page");
        assert_eq!(meta.description, config.site.default_description);
        assert_eq!(meta.robots_policy, "noindex, follow");
        assert_eq!(meta.route_key, "fr-some-page");
    }

    #[test]
    fn test_rtl_direction() {
        let config = config();
        let catalog = test_catalog();
        let meta = Resolver::new(&config, &catalog).resolve("/ar/features", &[]);
        assert_eq!(meta.text_direction, TextDirection::Rtl);
        assert_eq!(meta.content_locale, "en");
    }

    #[test]
    fn test_route_key_stable_query_subset() {
        let query = vec![
            ("utm_source".to_string(), "x".to_string()),
            ("trip".to_string(), "42".to_string()),
            ("share".to_string(), "AbC".to_string()),
        ];
        assert_eq!(route_key("/trip", &query), "trip-share-abc-trip-42");
        assert_eq!(route_key("/trip", &[]), "trip");
    }
}
