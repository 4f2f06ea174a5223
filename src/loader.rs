//! Decoding of raw image bytes.

use crate::error::Result;
use image::{GenericImageView, RgbImage};
use tracing::debug;

/// Decode `input` (any format the `image` crate recognizes) into an 8-bit RGB
/// buffer. Alpha, if present, is dropped.
pub fn load_rgb(input: &[u8]) -> Result<RgbImage> {
    let img = image::load_from_memory(input)?;
    let (width, height) = img.dimensions();
    debug!(width, height, color = ?img.color(), "decoded image");

    Ok(img.to_rgb8())
}
