//! Shared SVG card template.
//!
//! ```text
//! ┌──────────────────────────────┬───────────────────┐
//! │ [pill]                       │                   │
//! │ Title, wrapped               │    side panel     │
//! │ Description, wrapped         │  map / image /    │
//! │                              │     pattern       │
//! │ Site mark                    │                   │
//! │ example.com/path             │                   │
//! └──────────────────────────────┴───────────────────┘
//! ```

use std::fmt::Write;

use super::{
    RenderPayload,
    wrap::{DESCRIPTION_BUDGET, title_budget, wrap},
};
use crate::{
    trip::MapLabel,
    utils::{escape::escape, fmt::truncate_chars},
};

pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 630;

pub const PANEL_X: u32 = 640;
pub const PANEL_WIDTH: u32 = CANVAS_WIDTH - PANEL_X;
const MARGIN: u32 = 64;
const DISPLAY_URL_MAX: usize = 48;

const BACKGROUND: &str = "#f8fafc";
const INK: &str = "#0f172a";
const MUTED: &str = "#475569";
const ACCENT: &str = "#2563eb";

/// What fills the right-hand panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    /// Route map (inlined image data URI) with labels.
    Map { href: String, labels: Vec<MapLabel> },
    /// Blog hero image as an inlined data URI.
    Image { href: String },
    /// Decorative dotted route.
    Pattern,
}

/// Site-wide text drawn on every card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chrome {
    pub site_name: String,
    /// Host shown before the path in the footer, e.g. `wayfarer.example`.
    pub site_host: String,
}

impl Chrome {
    pub fn from_site_url(site_name: &str, site_url: &str) -> Self {
        let site_host = url::Url::parse(site_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
            .unwrap_or_else(|| site_url.to_string());
        Self {
            site_name: site_name.to_string(),
            site_host,
        }
    }

    /// `host/path` truncated for the footer.
    pub fn display_url(&self, path: &str) -> String {
        let path = if path == "/" { "" } else { path };
        truncate_chars(&format!("{}{}", self.site_host, path), DISPLAY_URL_MAX)
    }
}

/// Render the card SVG for `payload` with the given panel.
pub fn card_svg(payload: &RenderPayload, chrome: &Chrome, panel: &Panel) -> String {
    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CANVAS_WIDTH}" height="{CANVAS_HEIGHT}" viewBox="0 0 {CANVAS_WIDTH} {CANVAS_HEIGHT}" font-family="sans-serif">"#
    );
    let _ = write!(
        svg,
        r#"<rect width="{CANVAS_WIDTH}" height="{CANVAS_HEIGHT}" fill="{BACKGROUND}"/>"#
    );

    write_panel(&mut svg, panel);

    if let Some((tint, intensity)) = payload.effective_tint() {
        let _ = write!(
            svg,
            r#"<rect width="{CANVAS_WIDTH}" height="{CANVAS_HEIGHT}" fill="{}" fill-opacity="{intensity:.3}"/>"#,
            escape(tint)
        );
    }

    let mut y = 72;
    if !payload.pill.trim().is_empty() {
        write_pill(&mut svg, &payload.pill, y);
        y += 76;
    } else {
        y += 24;
    }

    let budget = title_budget(&payload.title);
    let line_height = budget.font_size * 115 / 100;
    for line in wrap(&payload.title, budget) {
        y += line_height;
        let _ = write!(
            svg,
            r#"<text x="{MARGIN}" y="{y}" font-size="{}" font-weight="700" fill="{INK}">{}</text>"#,
            budget.font_size,
            escape(&line)
        );
    }

    y += 20;
    for line in wrap(&payload.description, DESCRIPTION_BUDGET) {
        y += 38;
        let _ = write!(
            svg,
            r#"<text x="{MARGIN}" y="{y}" font-size="{}" fill="{MUTED}">{}</text>"#,
            DESCRIPTION_BUDGET.font_size,
            escape(&line)
        );
    }

    let _ = write!(
        svg,
        r#"<text x="{MARGIN}" y="556" font-size="28" font-weight="700" fill="{ACCENT}">{}</text>"#,
        escape(&chrome.site_name)
    );
    let _ = write!(
        svg,
        r#"<text x="{MARGIN}" y="594" font-size="22" fill="{MUTED}">{}</text>"#,
        escape(&chrome.display_url(&payload.path))
    );

    svg.push_str("</svg>");
    svg
}

fn write_pill(svg: &mut String, pill: &str, y: u32) {
    let text = truncate_chars(pill.trim(), 32);
    let width = 40 + text.chars().count() as u32 * 12;
    let _ = write!(
        svg,
        r##"<rect x="{MARGIN}" y="{y}" width="{width}" height="44" rx="22" fill="{ACCENT}" fill-opacity="0.12"/><text x="{}" y="{}" font-size="20" font-weight="700" fill="{ACCENT}">{}</text>"##,
        MARGIN + 20,
        y + 29,
        escape(&text)
    );
}

fn write_panel(svg: &mut String, panel: &Panel) {
    match panel {
        Panel::Map { href, labels } => {
            write_image(svg, href);
            for label in labels {
                write_label(svg, label);
            }
        }
        Panel::Image { href } => write_image(svg, href),
        Panel::Pattern => write_pattern(svg),
    }
}

fn write_image(svg: &mut String, href: &str) {
    let _ = write!(
        svg,
        r#"<image x="{PANEL_X}" y="0" width="{PANEL_WIDTH}" height="{CANVAS_HEIGHT}" preserveAspectRatio="xMidYMid slice" href="{}"/>"#,
        escape(href)
    );
}

#[allow(clippy::cast_possible_truncation)]
fn write_label(svg: &mut String, label: &MapLabel) {
    let x = f64::from(PANEL_X) + label.x * f64::from(PANEL_WIDTH);
    let y = label.y * f64::from(CANVAS_HEIGHT);
    let name = escape(&label.name);
    let _ = write!(
        svg,
        r#"<circle cx="{x:.1}" cy="{y:.1}" r="7" fill="{ACCENT}" stroke="white" stroke-width="3"/>"#
    );
    let _ = write!(
        svg,
        r#"<text x="{x:.1}" y="{:.1}" font-size="20" font-weight="700" text-anchor="middle" fill="{INK}" stroke="white" stroke-width="5" paint-order="stroke">{name}</text>"#,
        y - 16.0
    );
    if let Some(tag) = &label.tag {
        let _ = write!(
            svg,
            r#"<text x="{x:.1}" y="{:.1}" font-size="13" font-weight="700" text-anchor="middle" fill="{ACCENT}" stroke="white" stroke-width="4" paint-order="stroke">{}</text>"#,
            y - 40.0,
            escape(tag)
        );
    }
}

fn write_pattern(svg: &mut String) {
    let _ = write!(
        svg,
        r##"<defs><pattern id="dots" width="28" height="28" patternUnits="userSpaceOnUse"><circle cx="14" cy="14" r="2" fill="#93c5fd"/></pattern></defs><rect x="{PANEL_X}" y="0" width="{PANEL_WIDTH}" height="{CANVAS_HEIGHT}" fill="#e0f2fe"/><rect x="{PANEL_X}" y="0" width="{PANEL_WIDTH}" height="{CANVAS_HEIGHT}" fill="url(#dots)"/><path d="M 720 500 C 820 360, 960 560, 1040 360 S 1120 180, 1100 130" fill="none" stroke="{ACCENT}" stroke-width="6" stroke-dasharray="2 16" stroke-linecap="round"/><circle cx="720" cy="500" r="14" fill="{ACCENT}"/><circle cx="1100" cy="130" r="14" fill="white" stroke="{ACCENT}" stroke-width="6"/>"##
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chrome() -> Chrome {
        Chrome::from_site_url("Wayfarer", "https://www.wayfarer.example/")
    }

    #[test]
    fn test_display_url() {
        let chrome = chrome();
        assert_eq!(chrome.site_host, "wayfarer.example");
        assert_eq!(chrome.display_url("/"), "wayfarer.example");
        assert_eq!(chrome.display_url("/de/features"), "wayfarer.example/de/features");
        let long = chrome.display_url(&format!("/blog/{}", "a".repeat(80)));
        assert_eq!(long.chars().count(), 48);
        assert!(long.ends_with('…'));
    }

    #[test]
    fn test_svg_escapes_text() {
        let payload = RenderPayload {
            title: "Fish & <Chips>".into(),
            path: "/".into(),
            ..Default::default()
        };
        let svg = card_svg(&payload, &chrome(), &Panel::Pattern);
        assert!(svg.contains("Fish &amp; &lt;Chips&gt;"));
        assert!(!svg.contains("fill-opacity=\"0.350\""));
        assert!(svg.contains("url(#dots)"));
    }

    #[test]
    fn test_svg_tint_and_labels() {
        let payload = RenderPayload {
            title: "Loop".into(),
            tint: Some("#ff0000".into()),
            ..Default::default()
        };
        let panel = Panel::Map {
            href: "data:image/png;base64,AAAA".into(),
            labels: vec![MapLabel { name: "Tokyo".into(), x: 0.5, y: 0.5, tag: Some("START".into()) }],
        };
        let svg = card_svg(&payload, &chrome(), &panel);
        assert!(svg.contains(r##"fill="#ff0000" fill-opacity="0.350""##));
        assert!(svg.contains(">Tokyo</text>"));
        assert!(svg.contains(">START</text>"));
        assert!(svg.contains("<image "));
    }
}
