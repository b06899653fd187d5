//! Slug generation for route keys and asset file names.

use deunicode::deunicode;

/// Sentinel used when a slug would otherwise be empty.
pub const ROOT_SLUG: &str = "root";

/// Slugify arbitrary text into `[a-z0-9-]+`.
///
/// Unicode is transliterated to ASCII, runs of non-alphanumeric characters
/// collapse into one `-`, and leading/trailing separators are trimmed. Empty
/// input yields [`ROOT_SLUG`].
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let mut out = String::with_capacity(ascii.len());
    let mut pending_sep = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    if out.is_empty() {
        ROOT_SLUG.to_string()
    } else {
        out
    }
}

/// Normalize a place name into a comparison key (`"São Paulo "` -> `"saopaulo"`).
pub fn name_key(name: &str) -> String {
    deunicode(name)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Turn the last path segment into a display title (`"my-trip_plan"` -> `"My Trip Plan"`).
pub fn humanize_segment(segment: &str) -> String {
    segment
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_path() {
        assert_eq!(slugify("/de/blog/my-post"), "de-blog-my-post");
        assert_eq!(slugify("/"), "root");
        assert_eq!(slugify(""), "root");
        assert_eq!(slugify("//Blog//Post?x=1"), "blog-post-x-1");
    }

    #[test]
    fn test_slugify_unicode() {
        assert_eq!(slugify("/inspirations/country/côte-d'ivoire"), "inspirations-country-cote-d-ivoire");
        assert_eq!(slugify("---"), "root");
    }

    #[test]
    fn test_name_key() {
        assert_eq!(name_key("São Paulo "), "saopaulo");
        assert_eq!(name_key("TOKYO"), name_key("tokyo"));
    }

    #[test]
    fn test_humanize_segment() {
        assert_eq!(humanize_segment("my-trip_plan"), "My Trip Plan");
        assert_eq!(humanize_segment(""), "");
    }
}
