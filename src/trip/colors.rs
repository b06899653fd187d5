//! Leg color resolution.

use super::prefs::ColorMode;

/// Color used for every leg in brand mode and as the trip-mode fallback.
pub const BRAND_COLOR: &str = "#2563eb";

const THEME_TOKENS: [(&str, &str); 6] = [
    ("ocean", "#0ea5e9"),
    ("forest", "#16a34a"),
    ("sunset", "#f97316"),
    ("berry", "#c026d3"),
    ("slate", "#475569"),
    ("sand", "#d6a35c"),
];

/// Resolve a leg color as lowercase `#rrggbb`.
pub fn leg_color(mode: ColorMode, authored: Option<&str>) -> String {
    match mode {
        ColorMode::Brand => BRAND_COLOR.to_string(),
        ColorMode::Trip => authored
            .and_then(parse_color)
            .unwrap_or_else(|| BRAND_COLOR.to_string()),
    }
}

/// Parse `#rgb`, `#rrggbb`, `rgb(r, g, b)` or a theme token.
pub fn parse_color(raw: &str) -> Option<String> {
    let s = raw.trim().to_ascii_lowercase();

    if let Some(hex) = s.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        return match hex.len() {
            3 => Some(hex.chars().fold(String::from("#"), |mut acc, c| {
                acc.push(c);
                acc.push(c);
                acc
            })),
            6 => Some(format!("#{hex}")),
            _ => None,
        };
    }

    if let Some(body) = s.strip_prefix("rgb(").and_then(|b| b.strip_suffix(')')) {
        let channels: Vec<u8> = body
            .split(',')
            .map(|c| c.trim().parse::<u8>().ok())
            .collect::<Option<_>>()?;
        let [r, g, b] = channels.as_slice() else {
            return None;
        };
        return Some(format!("#{r:02x}{g:02x}{b:02x}"));
    }

    THEME_TOKENS
        .iter()
        .find(|(token, _)| *token == s)
        .map(|(_, hex)| (*hex).to_string())
}

/// `#rrggbb` to the static map API's `0xrrggbb` form.
pub fn to_map_color(hex: &str) -> String {
    format!("0x{}", hex.trim_start_matches('#'))
}
