//! Vector-only compositor for bulk builds.

use std::{fs, path::PathBuf};

use image::RgbaImage;

use super::{
    Compositor, RenderError, RenderPayload,
    fonts::FONTS,
    layout::{Chrome, Panel, card_svg},
    raster::rasterize,
};
use crate::{config::SiteConfig, debug, log, utils::mime};

/// Loads fonts from the assets root and never touches the network.
///
/// Blog and map images are replaced by the decorative pattern, so the output
/// depends on nothing but the payload and the local font files.
pub struct VectorCompositor {
    assets_root: PathBuf,
    fonts: Vec<String>,
    chrome: Chrome,
}

impl VectorCompositor {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            assets_root: config.build.assets_root.clone(),
            fonts: config.build.fonts.clone(),
            chrome: Chrome::from_site_url(&config.site.name, &config.site.url),
        }
    }

    fn load_fonts(&self) -> Vec<Vec<u8>> {
        let mut loaded = Vec::with_capacity(self.fonts.len());
        for font in &self.fonts {
            let path = self.assets_root.join(font.trim_start_matches('/'));
            if !mime::is_font(mime::from_path(&path)) {
                debug!("fonts"; "skip {}: not a font file", path.display());
                continue;
            }
            match fs::read(&path) {
                Ok(data) => loaded.push(data),
                Err(err) => debug!("fonts"; "skip {}: {}", path.display(), err),
            }
        }
        if loaded.is_empty() && !self.fonts.is_empty() {
            log!("warning"; "no card fonts found under {}, using system fonts", self.assets_root.display());
        }
        loaded
    }
}

impl Compositor for VectorCompositor {
    fn render(&self, payload: &RenderPayload) -> Result<RgbaImage, RenderError> {
        let key = self.assets_root.to_string_lossy();
        let fontdb = FONTS.get_or_load(&key, || self.load_fonts());
        let svg = card_svg(payload, &self.chrome, &Panel::Pattern);
        rasterize(&svg, fontdb)
    }
}
