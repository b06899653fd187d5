use thiserror::Error;

/// Failure while turning a payload into pixels.
///
/// Missing optional inputs (fonts, images, maps) degrade the card instead of
/// producing one of these.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("card template did not parse: {0}")]
    Svg(#[from] usvg::Error),

    #[error("cannot allocate {0}x{1} pixmap")]
    Pixmap(u32, u32),

    #[error("png encode failed: {0}")]
    Encode(#[from] image::ImageError),
}
