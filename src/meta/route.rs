//! Ordered route table.
//!
//! Each rule pairs a matcher on the locale-stripped base path with a resolver
//! that builds a [`RouteDef`] from the content catalog. Rules are tried in
//! order and the first resolver returning `Some` wins:
//!
//! 1. exact static page
//! 2. `/blog/:slug`
//! 3. `/inspirations/country/:name`
//! 4. `/example/:templateId`
//! 5. `/inspirations…`
//! 6. generic fallback from path segments

use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

use crate::{
    config::SiteSection,
    content::{ContentCatalog, LocalizedCopy, PageKind},
    debug,
    utils::slug::humanize_segment,
};

static BLOG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/blog/([^/]+)$").unwrap());
static COUNTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/inspirations/country/([^/]+)$").unwrap());
static EXAMPLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/example/([^/]+)$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Marketing,
    Tool,
    Blog,
    Country,
    Example,
    Inspirations,
    Fallback,
}

impl RouteKind {
    /// Whether the canonical path follows the requested locale.
    pub const fn is_localized(self) -> bool {
        !matches!(self, Self::Tool | Self::Fallback)
    }
}

/// Everything the resolver needs to know about one matched route.
#[derive(Debug, Clone)]
pub struct RouteDef {
    pub kind: RouteKind,
    /// Locales the route has content in, in site order.
    pub locales: Vec<String>,
    pub source_locale: String,
    /// Tool pages that opt into per-locale canonical paths.
    pub localized_canonical: bool,
    pub copy: BTreeMap<String, LocalizedCopy>,
    /// Used when no locale has copy.
    pub fallback: LocalizedCopy,
    pub image: Option<String>,
    pub tint: Option<String>,
    pub tint_intensity: Option<f32>,
    pub indexable: bool,
}

impl RouteDef {
    fn new(kind: RouteKind, site: &SiteSection) -> Self {
        Self {
            kind,
            locales: site.locales.clone(),
            source_locale: site.default_locale.clone(),
            localized_canonical: false,
            copy: BTreeMap::new(),
            fallback: LocalizedCopy::default(),
            image: None,
            tint: None,
            tint_intensity: None,
            indexable: true,
        }
    }

    /// Restrict available locales to those with copy, keeping site order.
    fn with_copy(mut self, copy: &BTreeMap<String, LocalizedCopy>, site: &SiteSection) -> Self {
        self.copy = copy.clone();
        if !copy.is_empty() {
            self.locales = site
                .locales
                .iter()
                .filter(|l| copy.contains_key(*l))
                .cloned()
                .collect();
        }
        self
    }

    fn with_source(mut self, source: Option<&String>) -> Self {
        if let Some(source) = source {
            self.source_locale = source.clone();
        }
        if !self.locales.contains(&self.source_locale)
            && let Some(first) = self.locales.first()
        {
            self.source_locale = first.clone();
        }
        self
    }

    /// Copy for `locale`, falling back to the source locale, then the fallback text.
    pub fn copy_for(&self, locale: &str) -> LocalizedCopy {
        self.copy
            .get(locale)
            .or_else(|| self.copy.get(&self.source_locale))
            .or_else(|| self.copy.values().next())
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }

    pub fn has_copy(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l == locale)
            && (self.copy.is_empty() || self.copy.contains_key(locale))
    }
}

/// Inputs shared by all rule resolvers.
pub struct RouteCtx<'a> {
    pub site: &'a SiteSection,
    pub catalog: &'a ContentCatalog,
    pub base: &'a str,
}

enum Matcher {
    /// Base path listed in the catalog's static pages.
    Static,
    Pattern(&'static LazyLock<Regex>),
    Prefix(&'static str),
    Any,
}

type Resolve = fn(&RouteCtx<'_>, Option<&str>) -> Option<RouteDef>;

pub struct Rule {
    pub name: &'static str,
    matcher: Matcher,
    resolve: Resolve,
}

impl Rule {
    /// Run the matcher; on success pass the first capture (if any) to the resolver.
    fn apply(&self, ctx: &RouteCtx<'_>) -> Option<RouteDef> {
        match &self.matcher {
            Matcher::Static => (self.resolve)(ctx, None),
            Matcher::Pattern(re) => {
                let caps = re.captures(ctx.base)?;
                (self.resolve)(ctx, caps.get(1).map(|m| m.as_str()))
            }
            Matcher::Prefix(prefix) => {
                let matches = ctx.base == *prefix
                    || ctx
                        .base
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('/'));
                if matches { (self.resolve)(ctx, None) } else { None }
            }
            Matcher::Any => (self.resolve)(ctx, None),
        }
    }
}

/// The fixed-priority rule list.
pub fn rules() -> &'static [Rule] {
    static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
        vec![
            Rule { name: "static", matcher: Matcher::Static, resolve: resolve_static },
            Rule { name: "blog", matcher: Matcher::Pattern(&BLOG), resolve: resolve_blog },
            Rule { name: "country", matcher: Matcher::Pattern(&COUNTRY), resolve: resolve_country },
            Rule { name: "example", matcher: Matcher::Pattern(&EXAMPLE), resolve: resolve_example },
            Rule {
                name: "inspirations",
                matcher: Matcher::Prefix("/inspirations"),
                resolve: resolve_inspirations,
            },
            Rule { name: "fallback", matcher: Matcher::Any, resolve: resolve_fallback },
        ]
    });
    &RULES
}

/// First matching rule's definition. The fallback rule always matches.
pub fn lookup(ctx: &RouteCtx<'_>) -> RouteDef {
    for rule in rules() {
        if let Some(def) = rule.apply(ctx) {
            debug!("meta"; "{} matched {} rule", ctx.base, rule.name);
            return def;
        }
    }
    fallback_def(ctx)
}

fn resolve_static(ctx: &RouteCtx<'_>, _: Option<&str>) -> Option<RouteDef> {
    let page = ctx.catalog.page(ctx.base)?;
    let kind = match page.kind {
        PageKind::Marketing => RouteKind::Marketing,
        PageKind::Tool => RouteKind::Tool,
    };
    let mut def = RouteDef::new(kind, ctx.site).with_copy(&page.copy, ctx.site);
    if !page.locales.is_empty() {
        def.locales.retain(|l| page.locales.contains(l));
    }
    def = def.with_source(None);
    def.localized_canonical = page.localized_canonical;
    def.tint = page.tint.clone();
    def.tint_intensity = page.tint_intensity;
    def.fallback = LocalizedCopy {
        title: humanize_last(ctx.base, &ctx.site.name),
        description: ctx.site.default_description.clone(),
        pill: None,
    };
    Some(def)
}

fn resolve_blog(ctx: &RouteCtx<'_>, slug: Option<&str>) -> Option<RouteDef> {
    let post = ctx.catalog.blog_post(slug?)?;
    let mut def = RouteDef::new(RouteKind::Blog, ctx.site)
        .with_copy(&post.copy, ctx.site)
        .with_source(post.source_locale.as_ref());
    def.image = post.image.clone();
    def.tint = post.tint.clone();
    def.tint_intensity = post.tint_intensity;
    def.fallback = LocalizedCopy {
        title: humanize_segment(&post.slug),
        description: ctx.site.default_description.clone(),
        pill: None,
    };
    Some(def)
}

fn resolve_country(ctx: &RouteCtx<'_>, name: Option<&str>) -> Option<RouteDef> {
    let country = ctx.catalog.country(name?)?;
    let mut def = RouteDef::new(RouteKind::Country, ctx.site)
        .with_copy(&country.copy, ctx.site)
        .with_source(None);
    def.tint = country.tint.clone();
    def.fallback = LocalizedCopy {
        title: humanize_segment(&country.name),
        description: ctx.site.default_description.clone(),
        pill: None,
    };
    Some(def)
}

fn resolve_example(ctx: &RouteCtx<'_>, id: Option<&str>) -> Option<RouteDef> {
    let example = ctx.catalog.example(id?)?;
    let mut def = RouteDef::new(RouteKind::Example, ctx.site)
        .with_copy(&example.copy, ctx.site)
        .with_source(example.source_locale.as_ref());
    def.tint = example.tint.clone();
    def.fallback = LocalizedCopy {
        title: humanize_segment(&example.id),
        description: ctx.site.default_description.clone(),
        pill: None,
    };
    Some(def)
}

fn resolve_inspirations(ctx: &RouteCtx<'_>, _: Option<&str>) -> Option<RouteDef> {
    let mut def = RouteDef::new(RouteKind::Inspirations, ctx.site);
    def.fallback = LocalizedCopy {
        title: humanize_last(ctx.base, "Inspirations"),
        description: ctx.site.default_description.clone(),
        pill: None,
    };
    Some(def)
}

fn resolve_fallback(ctx: &RouteCtx<'_>, _: Option<&str>) -> Option<RouteDef> {
    Some(fallback_def(ctx))
}

fn fallback_def(ctx: &RouteCtx<'_>) -> RouteDef {
    let mut def = RouteDef::new(RouteKind::Fallback, ctx.site);
    def.indexable = false;
    def.fallback = LocalizedCopy {
        title: humanize_last(ctx.base, &ctx.site.name),
        description: ctx.site.default_description.clone(),
        pill: None,
    };
    def
}

/// Humanized last path segment, or `default` for the root path.
fn humanize_last(base: &str, default: &str) -> String {
    let title = base
        .rsplit('/')
        .find(|s| !s.is_empty())
        .map(humanize_segment)
        .unwrap_or_default();
    if title.is_empty() {
        default.to_string()
    } else {
        title
    }
}
