//! Content catalog: pages, blog posts, countries and example templates.
//!
//! Loaded from the TOML file named by `site.content`. The catalog is the only
//! source of localized copy; the resolver never hard-codes text.
//!
//! ```toml
//! [[pages]]
//! path = "/features"
//! kind = "marketing"
//! [pages.copy.en]
//! title = "Features"
//! description = "Everything you need to plan a trip."
//!
//! [[blog]]
//! slug = "packing-list"
//! source_locale = "en"
//! image = "/images/blog/packing-list.jpg"
//! [blog.copy.en]
//! title = "The only packing list you need"
//! description = "..."
//! ```

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Localized copy for one route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizedCopy {
    pub title: String,
    pub description: String,
    /// Short badge text rendered above the title.
    pub pill: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    #[default]
    Marketing,
    Tool,
}

/// A static marketing or tool page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    /// Locale-stripped base path, e.g. `/features`.
    pub path: String,
    pub kind: PageKind,
    /// Tool pages normally canonicalize to the unprefixed path.
    pub localized_canonical: bool,
    /// Restricts the page to these locales; empty means every site locale.
    pub locales: Vec<String>,
    pub tint: Option<String>,
    pub tint_intensity: Option<f32>,
    pub copy: BTreeMap<String, LocalizedCopy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogPost {
    pub slug: String,
    /// Locale the post was written in; defaults to the site default locale.
    pub source_locale: Option<String>,
    /// Blog hero image, a site-relative path.
    pub image: Option<String>,
    pub tint: Option<String>,
    pub tint_intensity: Option<f32>,
    pub copy: BTreeMap<String, LocalizedCopy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Country {
    /// URL segment, e.g. `japan`.
    pub name: String,
    pub tint: Option<String>,
    pub copy: BTreeMap<String, LocalizedCopy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExampleTemplate {
    pub id: String,
    pub source_locale: Option<String>,
    pub tint: Option<String>,
    pub copy: BTreeMap<String, LocalizedCopy>,
}

/// Section badges per locale, used when a route's copy has no pill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub blog: String,
    pub country: String,
    pub example: String,
    pub inspirations: String,
    pub shared_trip: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            blog: "Blog".into(),
            country: "Destination".into(),
            example: "Example trip".into(),
            inspirations: "Inspirations".into(),
            shared_trip: "Shared Trip".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentCatalog {
    pub pages: Vec<Page>,
    pub blog: Vec<BlogPost>,
    pub countries: Vec<Country>,
    pub examples: Vec<ExampleTemplate>,
    pub labels: BTreeMap<String, Labels>,
}

impl ContentCatalog {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read content catalog `{}`", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("invalid content catalog `{}`", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut catalog: Self = toml::from_str(content)?;
        for page in &mut catalog.pages {
            page.path = normalize_base(&page.path);
        }
        Ok(catalog)
    }

    pub fn page(&self, base: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.path == base)
    }

    pub fn blog_post(&self, slug: &str) -> Option<&BlogPost> {
        self.blog.iter().find(|p| p.slug == slug)
    }

    pub fn country(&self, name: &str) -> Option<&Country> {
        self.countries
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn example(&self, id: &str) -> Option<&ExampleTemplate> {
        self.examples.iter().find(|e| e.id == id)
    }

    /// Section labels for `locale`, falling back to `fallback` and then English.
    pub fn labels(&self, locale: &str, fallback: &str) -> Labels {
        self.labels
            .get(locale)
            .or_else(|| self.labels.get(fallback))
            .cloned()
            .unwrap_or_default()
    }
}

fn normalize_base(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Small catalog shared by resolver and batch tests.
#[cfg(test)]
pub fn test_catalog() -> ContentCatalog {
    ContentCatalog::parse(
        r#"
[[pages]]
path = "/"
[pages.copy.en]
title = "Plan trips together"
description = "Collaborative itineraries with maps."
[pages.copy.de]
title = "Reisen gemeinsam planen"
description = "Gemeinsame Reisepläne mit Karten."

[[pages]]
path = "/features"
[pages.copy.en]
title = "Features"
description = "Everything you need to plan a trip."
pill = "Product"
[pages.copy.de]
title = "Funktionen"
description = "Alles, was du für deine Reise brauchst."
pill = "Produkt"

[[pages]]
path = "/planner/"
kind = "tool"
[pages.copy.en]
title = "Trip planner"
description = "Drag stops onto a timeline."
[pages.copy.de]
title = "Reiseplaner"
description = "Stopps auf eine Zeitleiste ziehen."

[[blog]]
slug = "packing-list"
image = "/images/blog/packing-list.jpg"
[blog.copy.en]
title = "The only packing list you need"
description = "Pack light, travel far."

[[blog]]
slug = "wanderwege"
source_locale = "de"
[blog.copy.de]
title = "Die schönsten Wanderwege"
description = "Unterwegs in den Alpen."

[[countries]]
name = "japan"
[countries.copy.en]
title = "Japan"
description = "Temples, trains and ramen."
[countries.copy.de]
title = "Japan"
description = "Tempel, Züge und Ramen."

[[examples]]
id = "kyoto-weekend"
[examples.copy.en]
title = "A weekend in Kyoto"
description = "Two days of gardens."

[labels.de]
blog = "Blog"
country = "Reiseziel"
example = "Beispielreise"
inspirations = "Inspirationen"
shared_trip = "Geteilte Reise"
"#,
    )
    .unwrap()
}
