//! Target filters for partial rebuilds.

use super::targets::Target;
use crate::meta::normalize_path;

/// Include/exclude filters. An empty filter selects every target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetFilter {
    pub locales: Vec<String>,
    pub include_paths: Vec<String>,
    pub include_prefixes: Vec<String>,
    pub exclude_paths: Vec<String>,
    pub exclude_prefixes: Vec<String>,
}

impl TargetFilter {
    /// Normalize every path so `/de/features/` and `/de/features` agree.
    pub fn new(
        locales: Vec<String>,
        include_paths: Vec<String>,
        include_prefixes: Vec<String>,
        exclude_paths: Vec<String>,
        exclude_prefixes: Vec<String>,
    ) -> Self {
        let paths = |v: Vec<String>| v.iter().map(|p| normalize_path(p)).collect();
        Self {
            locales: locales.into_iter().map(|l| l.trim().to_string()).collect(),
            include_paths: paths(include_paths),
            include_prefixes: paths(include_prefixes),
            exclude_paths: paths(exclude_paths),
            exclude_prefixes: paths(exclude_prefixes),
        }
    }

    /// True when the build covers the whole target set.
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
            && self.include_paths.is_empty()
            && self.include_prefixes.is_empty()
            && self.exclude_paths.is_empty()
            && self.exclude_prefixes.is_empty()
    }

    pub fn matches(&self, target: &Target) -> bool {
        if !self.locales.is_empty() && !self.locales.iter().any(|l| l == target.content_locale()) {
            return false;
        }

        let mut candidates = vec![target.path.as_str(), target.meta.canonical_path.as_str()];
        if !self.locales.is_empty() {
            candidates.push(target.base.as_str());
        }

        let hit = |paths: &[String], prefixes: &[String]| {
            candidates.iter().any(|c| {
                paths.iter().any(|p| p == c) || prefixes.iter().any(|p| has_prefix(c, p))
            })
        };

        let included = (self.include_paths.is_empty() && self.include_prefixes.is_empty())
            || hit(&self.include_paths, &self.include_prefixes);
        included && !hit(&self.exclude_paths, &self.exclude_prefixes)
    }
}

/// Segment-aware prefix test: `/blog` matches `/blog/x` but not `/blogroll`.
fn has_prefix(path: &str, prefix: &str) -> bool {
    prefix == "/"
        || path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{batch::targets::enumerate, config::test_parse_config, content::test_catalog};

    fn targets() -> Vec<Target> {
        let config = test_parse_config("[site]\nlocales = [\"en\", \"de\"]");
        enumerate(&config, &test_catalog())
    }

    fn selected(filter: &TargetFilter) -> Vec<String> {
        targets()
            .iter()
            .filter(|t| filter.matches(t))
            .map(|t| t.route_key().to_string())
            .collect()
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_filter_selects_all() {
        let filter = TargetFilter::default();
        assert!(filter.is_empty());
        assert_eq!(selected(&filter).len(), targets().len());
    }

    #[test]
    fn test_locale_filter_uses_content_locale() {
        let filter = TargetFilter::new(strings(&["de"]), vec![], vec![], vec![], vec![]);
        let keys = selected(&filter);
        assert!(keys.contains(&"de".to_string()));
        assert!(keys.contains(&"de-features".to_string()));
        // German-only post requested in English still counts as German.
        assert!(keys.contains(&"de-blog-wanderwege".to_string()));
        assert!(!keys.contains(&"root".to_string()));
        assert!(!keys.contains(&"blog-packing-list".to_string()));
    }

    #[test]
    fn test_locale_filter_matches_base_path() {
        let filter = TargetFilter::new(strings(&["de"]), strings(&["/features"]), vec![], vec![], vec![]);
        assert_eq!(selected(&filter), ["de-features"]);

        let unfiltered = TargetFilter::new(vec![], strings(&["/features"]), vec![], vec![], vec![]);
        assert_eq!(selected(&unfiltered), ["features"]);
    }

    #[test]
    fn test_prefixes_are_segment_aware() {
        let filter = TargetFilter::new(vec![], vec![], strings(&["/blog/"]), vec![], vec![]);
        let keys = selected(&filter);
        // The German-only post was first enumerated at `/blog/wanderwege`.
        assert_eq!(keys, ["blog-packing-list", "de-blog-wanderwege"]);

        let filter = TargetFilter::new(vec![], vec![], strings(&["/de"]), vec![], strings(&["/de/blog"]));
        let keys = selected(&filter);
        assert!(keys.contains(&"de-features".to_string()));
        assert!(!keys.iter().any(|k| k.starts_with("de-blog")));
    }

    #[test]
    fn test_exclude_paths() {
        let filter = TargetFilter::new(vec![], vec![], vec![], strings(&["/", "/de"]), vec![]);
        let keys = selected(&filter);
        assert!(!keys.contains(&"root".to_string()));
        assert!(!keys.contains(&"de".to_string()));
        assert!(keys.contains(&"features".to_string()));
    }

    #[test]
    fn test_exclude_prefix_without_locale_filter() {
        let filter = TargetFilter::new(vec![], vec![], vec![], vec![], strings(&["/blog"]));
        let keys = selected(&filter);
        assert!(!keys.iter().any(|k| k.contains("blog")));
        assert!(keys.contains(&"root".to_string()));
        assert!(keys.contains(&"de-features".to_string()));
        assert_eq!(keys.len(), targets().len() - 2);
    }

    #[test]
    fn test_has_prefix() {
        assert!(has_prefix("/blog/x", "/blog"));
        assert!(has_prefix("/blog", "/blog"));
        assert!(!has_prefix("/blogroll", "/blog"));
        assert!(has_prefix("/anything", "/"));
    }
}
