use std::{io::Cursor, sync::Arc};

use image::{ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use usvg::fontdb::Database;

use super::{
    RenderError,
    layout::{CANVAS_HEIGHT, CANVAS_WIDTH},
};

/// Rasterize a card SVG at canvas size into straight-alpha RGBA.
pub fn rasterize(svg: &str, fontdb: Arc<Database>) -> Result<RgbaImage, RenderError> {
    let options = usvg::Options {
        fontdb,
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &options)?;

    let mut pixmap = Pixmap::new(CANVAS_WIDTH, CANVAS_HEIGHT)
        .ok_or(RenderError::Pixmap(CANVAS_WIDTH, CANVAS_HEIGHT))?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    let mut out = RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(out)
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}
