//! Framebuffer snapshots as PNG files

use std::path::Path;

use image::RgbaImage;

use super::scene::SceneError;
use crate::rasterizer::Framebuffer;

/// Copy the color buffer into an `RgbaImage` (row-major, top row first)
pub fn framebuffer_to_image(fb: &Framebuffer) -> Result<RgbaImage, SceneError> {
    let (width, height) = (fb.width(), fb.height());
    let invalid = || SceneError::InvalidDimensions { width, height };
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    let w = u32::try_from(width).map_err(|_| invalid())?;
    let h = u32::try_from(height).map_err(|_| invalid())?;
    RgbaImage::from_raw(w, h, fb.to_rgba_bytes()).ok_or_else(invalid)
}

/// Write the color buffer to `path` as PNG
pub fn save_png<P: AsRef<Path>>(fb: &Framebuffer, path: P) -> Result<(), SceneError> {
    let path = path.as_ref();
    let img = framebuffer_to_image(fb)?;
    img.save_with_format(path, image::ImageFormat::Png)?;
    tracing::info!(path = %path.display(), width = fb.width(), height = fb.height(), "saved screenshot");
    Ok(())
}
