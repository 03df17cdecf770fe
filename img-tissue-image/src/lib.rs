pub mod raster;
pub mod settings;
pub mod svg;
pub mod wireframe;

pub use crate::{raster::RasterSurface, settings::*, svg::SvgSurface, wireframe::*};
use image::RgbaImage;
use std::path::Path;

/// Error thrown by rendering surfaces.
#[derive(thiserror::Error, Debug)]
pub enum SurfaceError {
    /// Image could not be decoded or encoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    /// File could not be read or written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load and decode texture image.
///
/// # Arguments
/// * `path` - Image file path.
///
/// # Returns
/// RGBA texture or error.
pub fn load_texture<P: AsRef<Path>>(path: P) -> Result<RgbaImage, SurfaceError> {
    let path = path.as_ref();
    let image = image::open(path)?.to_rgba8();
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "texture loaded"
    );
    Ok(image)
}
