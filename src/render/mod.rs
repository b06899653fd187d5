//! Share card compositing.
//!
//! ```text
//! RenderPayload ─► layout (SVG) ─► raster (resvg) ─► RgbaImage ─► PNG
//! ```
//!
//! Two [`Compositor`]s share the layout: [`VectorCompositor`] for bulk builds
//! and [`OnDemandCompositor`] for the HTTP server.

mod error;
mod fonts;
pub mod layout;
mod ondemand;
mod payload;
mod raster;
mod vector;
mod wrap;

pub use error::RenderError;
pub use ondemand::OnDemandCompositor;
pub use payload::{DEFAULT_TINT_INTENSITY, MapPanel, RenderPayload};
pub use raster::encode_png;
pub use vector::VectorCompositor;

use anyhow::Result;
use image::RgbaImage;

use crate::config::{CompositorKind, SiteConfig};

/// Turns a payload into a 1200×630 bitmap.
pub trait Compositor: Send + Sync {
    fn render(&self, payload: &RenderPayload) -> Result<RgbaImage, RenderError>;
}

/// Build the configured compositor. `origin` is where the on-demand
/// compositor fetches fonts and relative images from.
pub fn compositor_for(config: &SiteConfig, origin: &str) -> Result<Box<dyn Compositor>> {
    Ok(match config.build.compositor {
        CompositorKind::Vector => Box::new(VectorCompositor::new(config)),
        CompositorKind::OnDemand => Box::new(OnDemandCompositor::new(config, origin)?),
    })
}

/// Render and encode in one step.
pub fn render_png(compositor: &dyn Compositor, payload: &RenderPayload) -> Result<Vec<u8>, RenderError> {
    encode_png(&compositor.render(payload)?)
}
