//! Compositor that fetches fonts and images over HTTP.

use std::{io::Cursor, time::Duration};

use anyhow::{Context, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use image::{ImageFormat, RgbaImage, imageops::FilterType};
use reqwest::blocking::Client;

use super::{
    Compositor, RenderError, RenderPayload,
    fonts::FONTS,
    layout::{CANVAS_HEIGHT, Chrome, PANEL_WIDTH, Panel, card_svg},
    raster::rasterize,
};
use crate::{config::SiteConfig, config::trim_origin, debug};

/// Fonts come from `<origin>/<font path>`, memoized per origin. Blog images
/// resolve against the origin; map images are absolute static-map URLs.
/// Any failed image fetch falls back to the decorative pattern.
pub struct OnDemandCompositor {
    origin: String,
    fonts: Vec<String>,
    chrome: Chrome,
    client: Client,
}

impl OnDemandCompositor {
    pub fn new(config: &SiteConfig, origin: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            origin: trim_origin(origin).to_string(),
            fonts: config.build.fonts.clone(),
            chrome: Chrome::from_site_url(&config.site.name, &config.site.url),
            client,
        })
    }

    fn absolute(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            format!("{}/{}", self.origin, href.trim_start_matches('/'))
        }
    }

    fn fetch(&self, href: &str) -> Result<Vec<u8>> {
        let url = self.absolute(href);
        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("GET {url}"))?;
        Ok(response.bytes()?.to_vec())
    }

    fn load_fonts(&self) -> Vec<Vec<u8>> {
        self.fonts
            .iter()
            .filter_map(|font| match self.fetch(font) {
                Ok(data) => Some(data),
                Err(err) => {
                    debug!("fonts"; "skip {}: {:#}", font, err);
                    None
                }
            })
            .collect()
    }

    /// Fetch a raster image and inline it, cropped to the side panel.
    fn panel_image(&self, href: &str) -> Result<String> {
        let bytes = self.fetch(href)?;
        let image = image::load_from_memory(&bytes).context("undecodable image")?;
        let cropped = image.resize_to_fill(PANEL_WIDTH, CANVAS_HEIGHT, FilterType::Triangle);

        let mut png = Cursor::new(Vec::new());
        cropped.write_to(&mut png, ImageFormat::Png)?;
        Ok(format!(
            "data:image/png;base64,{}",
            STANDARD.encode(png.into_inner())
        ))
    }

    fn panel(&self, payload: &RenderPayload) -> Panel {
        let attempt = if let Some(map) = &payload.map {
            self.panel_image(&map.image_url).map(|href| Panel::Map {
                href,
                labels: map.labels.clone(),
            })
        } else if let Some(image) = &payload.blog_image_ref {
            self.panel_image(image).map(|href| Panel::Image { href })
        } else {
            return Panel::Pattern;
        };

        attempt.unwrap_or_else(|err| {
            debug!("render"; "panel image unavailable, using pattern: {:#}", err);
            Panel::Pattern
        })
    }
}

impl Compositor for OnDemandCompositor {
    fn render(&self, payload: &RenderPayload) -> Result<RgbaImage, RenderError> {
        let fontdb = FONTS.get_or_load(&self.origin, || self.load_fonts());
        let svg = card_svg(payload, &self.chrome, &self.panel(payload));
        rasterize(&svg, fontdb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn compositor() -> OnDemandCompositor {
        OnDemandCompositor::new(&test_parse_config(""), "http://127.0.0.1:9/").unwrap()
    }

    #[test]
    fn test_absolute_urls() {
        let c = compositor();
        assert_eq!(c.absolute("/images/a.jpg"), "http://127.0.0.1:9/images/a.jpg");
        assert_eq!(c.absolute("fonts/x.ttf"), "http://127.0.0.1:9/fonts/x.ttf");
        assert_eq!(c.absolute("https://cdn.example/a.png"), "https://cdn.example/a.png");
    }

    #[test]
    fn test_unreachable_image_falls_back_to_pattern() {
        let c = compositor();
        let payload = RenderPayload {
            blog_image_ref: Some("/images/hero.jpg".into()),
            ..Default::default()
        };
        assert_eq!(c.panel(&payload), Panel::Pattern);
        assert_eq!(c.panel(&RenderPayload::default()), Panel::Pattern);
    }
}
