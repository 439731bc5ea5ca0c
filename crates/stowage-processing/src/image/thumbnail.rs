//! Thumbnail rendering

use anyhow::{Context, Result};
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::path::Path;

/// Render a thumbnail of `source` into `target`, keeping the aspect ratio.
///
/// Images already within `max_width` x `max_height` are copied at their
/// original size. The output format follows the target extension.
/// Returns the thumbnail dimensions.
pub fn render_thumbnail(
    source: &Path,
    target: &Path,
    max_width: u32,
    max_height: u32,
) -> Result<(u32, u32)> {
    let img = ImageReader::open(source)
        .with_context(|| format!("Failed to open {}", source.display()))?
        .with_guessed_format()
        .context("Failed to detect image format")?
        .decode()
        .with_context(|| format!("Failed to decode {}", source.display()))?;

    let thumb = if img.width() <= max_width && img.height() <= max_height {
        img
    } else {
        img.thumbnail(max_width, max_height)
    };

    // JPEG has no alpha channel
    let thumb = match ImageFormat::from_path(target) {
        Ok(ImageFormat::Jpeg) => DynamicImage::ImageRgb8(thumb.to_rgb8()),
        _ => thumb,
    };

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    thumb
        .save(target)
        .with_context(|| format!("Failed to write thumbnail {}", target.display()))?;

    Ok(thumb.dimensions())
}
