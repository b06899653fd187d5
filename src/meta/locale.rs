//! Request path normalization and locale prefix handling.

use percent_encoding::percent_decode_str;
use serde::Serialize;

use crate::config::SiteSection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

/// Normalize a request path.
///
/// Strips query and fragment, percent-decodes, collapses duplicate slashes and
/// drops the trailing slash (except for root).
pub fn normalize_path(raw: &str) -> String {
    let raw = raw.split(['?', '#']).next().unwrap_or_default();
    let decoded = percent_decode_str(raw).decode_utf8_lossy();

    let segments: Vec<&str> = decoded
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// A normalized path split into its locale and locale-stripped base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedPath {
    pub locale: String,
    pub base: String,
}

/// Split an optional leading locale segment off a normalized path.
///
/// Unknown or missing segments resolve to the default locale and are left in
/// the base path.
pub fn split_locale(path: &str, site: &SiteSection) -> LocalizedPath {
    let rest = path.trim_start_matches('/');
    let (first, tail) = rest.split_once('/').unwrap_or((rest, ""));

    match site.locales.iter().find(|l| l.eq_ignore_ascii_case(first)) {
        Some(locale) if !first.is_empty() => LocalizedPath {
            locale: locale.clone(),
            base: if tail.is_empty() {
                "/".to_string()
            } else {
                format!("/{tail}")
            },
        },
        _ => LocalizedPath {
            locale: site.default_locale.clone(),
            base: path.to_string(),
        },
    }
}

/// Prefix `base` with `locale` unless it is the default locale.
pub fn localize(base: &str, locale: &str, site: &SiteSection) -> String {
    if locale == site.default_locale {
        base.to_string()
    } else if base == "/" {
        format!("/{locale}")
    } else {
        format!("/{locale}{base}")
    }
}

pub fn direction(locale: &str, site: &SiteSection) -> TextDirection {
    if site.rtl_locales.iter().any(|l| l == locale) {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}

/// BCP 47 tag for the `<html lang>` attribute.
pub fn html_lang(locale: &str) -> String {
    match locale.split_once(['-', '_']) {
        Some((lang, region)) => format!("{}-{}", lang.to_ascii_lowercase(), region.to_ascii_uppercase()),
        None => locale.to_ascii_lowercase(),
    }
}
