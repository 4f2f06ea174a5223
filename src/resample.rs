//! Two-stage resize down to the clustering resolution.

use crate::config::ExtractorConfig;
use image::{RgbImage, imageops};
use tracing::debug;

/// Resize `img` to `resize_dims`, then to `small_image_size`, and return the
/// small image's pixels in row-major order.
///
/// The first stage bounds the cost of the second independently of the source
/// resolution. Aspect ratio is not preserved.
pub fn resample(img: &RgbImage, config: &ExtractorConfig) -> Vec<[u8; 3]> {
    let filter = config.resize_filter.into();

    let normalized = resize_to(img, config.resize_dims.width, config.resize_dims.height, filter);
    let small = resize_to(
        &normalized,
        config.small_image_size.width,
        config.small_image_size.height,
        filter,
    );

    let pixels: Vec<[u8; 3]> = small.pixels().map(|p| p.0).collect();
    debug!(
        source = ?img.dimensions(),
        sampled = pixels.len(),
        "resampled image"
    );

    pixels
}

fn resize_to(img: &RgbImage, width: u32, height: u32, filter: imageops::FilterType) -> RgbImage {
    // Fast path – no scaling required.
    if img.dimensions() == (width, height) {
        return img.clone();
    }

    imageops::resize(img, width, height, filter)
}
