//! XML escaping for text placed into SVG documents.

use std::borrow::Cow;

/// Characters that must be escaped in XML text and attribute contexts.
const ESCAPE_CHARS: [char; 5] = ['&', '<', '>', '"', '\''];

#[inline]
const fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape text for XML, borrowing when nothing needs escaping.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None if c.is_control() && c != '\n' && c != '\t' => {}
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}
