//! Dominant color palettes for paintings.
//!
//! Turns an arbitrary downloaded image into a short list of `#rrggbb` strings
//! describing its most prominent colors, for display in an artist guessing game.
//!
//! Steps performed:
//! 1. Decode the bytes to RGB, dropping alpha.
//! 2. Resize to `resize_dims`, then down to `small_image_size`.
//! 3. Convert every pixel to HLS.
//! 4. Drop pixels whose lightness or saturation is not above its threshold.
//! 5. Run seeded k-means (`k = num_colors`) over the remaining HLS points.
//! 6. Convert the centroids back to RGB hex strings.
//!
//! ```no_run
//! use painter_palette::{ExtractorConfig, extract_palette};
//!
//! let bytes = std::fs::read("starry_night.jpg")?;
//! let palette = extract_palette(&bytes, &ExtractorConfig::default());
//! // Empty if anything went wrong
//! println!("{palette:?}");
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod hls;
pub mod kmeans;
pub mod loader;
pub mod resample;
pub mod wasm;

pub use crate::{
    config::{Dimensions, ExtractorConfig, ResizeFilter},
    error::{ErrorKind, PaletteError, Result},
    fetch::ImageSource,
    filter::PerceptualFilter,
    hls::Hls,
    kmeans::ColorCluster,
};

#[cfg(all(feature = "fetch", not(target_arch = "wasm32")))]
pub use crate::fetch::HttpImageSource;

use tracing::{debug, warn};

/// Ordered `#rrggbb` strings, lowercase. Position carries no meaning.
pub type Palette = Vec<String>;

/// Run the full pipeline and return each cluster's centroid and population.
pub fn try_extract_clusters(input: &[u8], config: &ExtractorConfig) -> Result<Vec<ColorCluster>> {
    config.validate()?;

    let img = loader::load_rgb(input)?;
    let pixels = resample::resample(&img, config);

    let filter = PerceptualFilter::from(config);
    let filtered = filter.apply(pixels.iter().map(|&p| Hls::from_rgb(p)));
    debug!(
        sampled = pixels.len(),
        kept = filtered.len(),
        "filtered dark and desaturated pixels"
    );

    kmeans::cluster(
        config.num_colors,
        config.max_iterations,
        config.tolerance,
        &filtered,
        config.seed,
    )
}

/// Strict variant of [`extract_palette`]: every failure is returned.
pub fn try_extract_palette(input: &[u8], config: &ExtractorConfig) -> Result<Palette> {
    let clusters = try_extract_clusters(input, config)?;
    Ok(clusters.iter().map(|c| c.centroid.to_hex()).collect())
}

/// Extract exactly `config.num_colors` colors from encoded image bytes.
///
/// Never fails: undecodable input, an invalid configuration or too few colorful
/// pixels all produce an empty palette, so a caller can always render something.
pub fn extract_palette(input: &[u8], config: &ExtractorConfig) -> Palette {
    fail_soft(try_extract_palette(input, config))
}

/// Fetch `url` through `source`, then run [`try_extract_palette`] on the bytes.
pub fn try_extract_palette_from_url<S>(source: &S, url: &str, config: &ExtractorConfig) -> Result<Palette>
where
    S: ImageSource + ?Sized,
{
    config.validate()?;
    let bytes = source.fetch_image_bytes(url)?;
    try_extract_palette(&bytes, config)
}

/// Lenient counterpart of [`try_extract_palette_from_url`]; transport errors also
/// end up as an empty palette.
pub fn extract_palette_from_url<S>(source: &S, url: &str, config: &ExtractorConfig) -> Palette
where
    S: ImageSource + ?Sized,
{
    fail_soft(try_extract_palette_from_url(source, url, config))
}

fn fail_soft(result: Result<Palette>) -> Palette {
    result.unwrap_or_else(|e| {
        warn!(error = %e, kind = ?e.kind(), "palette extraction failed, returning empty palette");
        Vec::new()
    })
}
