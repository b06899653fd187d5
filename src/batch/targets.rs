//! Build target enumeration.

use rustc_hash::FxHashSet;

use crate::{
    config::SiteConfig,
    content::ContentCatalog,
    meta::{CanonicalMetadata, Resolver, localize},
};

/// One localized route to pre-render.
#[derive(Debug, Clone)]
pub struct Target {
    /// Requested path, e.g. `/de/features`.
    pub path: String,
    /// Locale-stripped path, e.g. `/features`.
    pub base: String,
    pub meta: CanonicalMetadata,
}

impl Target {
    pub fn route_key(&self) -> &str {
        &self.meta.route_key
    }

    pub fn content_locale(&self) -> &str {
        &self.meta.content_locale
    }
}

/// Locale-stripped paths of every catalog entry, in catalog order.
pub fn base_paths(catalog: &ContentCatalog) -> Vec<String> {
    let pages = catalog.pages.iter().map(|p| p.path.clone());
    let blog = catalog.blog.iter().map(|b| format!("/blog/{}", b.slug));
    let countries = catalog
        .countries
        .iter()
        .map(|c| format!("/inspirations/country/{}", c.name));
    let examples = catalog.examples.iter().map(|e| format!("/example/{}", e.id));
    pages.chain(blog).chain(countries).chain(examples).collect()
}

/// Every catalog route × every non-RTL locale. Targets whose route keys
/// collide (e.g. a tool page in every locale) collapse to the first.
/// Content that only exists in an RTL locale is skipped as well.
pub fn enumerate(config: &SiteConfig, catalog: &ContentCatalog) -> Vec<Target> {
    let site = &config.site;
    let resolver = Resolver::new(config, catalog);
    let locales: Vec<&String> = site.locales.iter().filter(|l| !config.is_rtl(l)).collect();

    let mut seen = FxHashSet::default();
    let mut targets = Vec::new();
    for base in base_paths(catalog) {
        for locale in &locales {
            let path = localize(&base, locale, site);
            let meta = resolver.resolve(&path, &[]);
            if config.is_rtl(&meta.content_locale) {
                continue;
            }
            if seen.insert(meta.route_key.clone()) {
                targets.push(Target {
                    path,
                    base: base.clone(),
                    meta,
                });
            }
        }
    }
    targets
}
