//! Tunable parameters for the palette extraction pipeline.
//!
//! Configuration can be built programmatically or loaded from JSON. Missing
//! fields fall back to their defaults:
//!
//! ```no_run
//! use painter_palette::ExtractorConfig;
//! use std::path::Path;
//!
//! let config = ExtractorConfig::from_json_file(Path::new("palette.json"))?;
//! let config = ExtractorConfig::from_json_str(r#"{ "num_colors": 6 }"#)?;
//! let config = ExtractorConfig::default().with_num_colors(4).with_seed(7);
//! # Ok::<(), painter_palette::PaletteError>(())
//! ```

use crate::error::{PaletteError, Result};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_NUM_COLORS: usize = 10;
pub const DEFAULT_RESIZE_DIMS: Dimensions = Dimensions::square(1000);
pub const DEFAULT_SMALL_IMAGE_SIZE: Dimensions = Dimensions::square(200);
pub const DEFAULT_BRIGHTNESS_THRESHOLD: f32 = 0.2;
pub const DEFAULT_SATURATION_THRESHOLD: f32 = 0.2;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_MAX_ITERATIONS: usize = 300;
pub const DEFAULT_TOLERANCE: f32 = 1e-6;

/// Largest palette the clusterer can produce.
pub const MAX_NUM_COLORS: usize = crate::kmeans::MAX_CLUSTERS;
/// Largest pixel count accepted for either intermediate image.
pub const MAX_AREA: u64 = 4096 * 4096;

/// Width and height of an intermediate image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `"WxH"` or a single `"N"` for an N×N square.
impl FromStr for Dimensions {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid dimension {v:?}: {e}"))
        };

        match s.split_once(['x', 'X']) {
            Some((w, h)) => Ok(Self::new(parse(w)?, parse(h)?)),
            None => parse(s).map(Self::square),
        }
    }
}

/// Interpolation used by both resize stages.
///
/// Every variant is deterministic for identical input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    /// Bicubic
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Complete configuration for one palette extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Number of clusters, and therefore palette entries
    pub num_colors: usize,

    /// Working resolution every source image is first normalized to
    pub resize_dims: Dimensions,

    /// Resolution of the image whose pixels are clustered
    pub small_image_size: Dimensions,

    /// Pixels must have lightness strictly above this value
    pub brightness_threshold: f32,

    /// Pixels must have saturation strictly above this value
    pub saturation_threshold: f32,

    pub resize_filter: ResizeFilter,

    /// Seed for k-means++ initialization. Identical seeds give identical palettes.
    pub seed: u64,

    pub max_iterations: usize,

    /// Lloyd iterations stop once the summed squared centroid shift drops to this value
    pub tolerance: f32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            num_colors: DEFAULT_NUM_COLORS,
            resize_dims: DEFAULT_RESIZE_DIMS,
            small_image_size: DEFAULT_SMALL_IMAGE_SIZE,
            brightness_threshold: DEFAULT_BRIGHTNESS_THRESHOLD,
            saturation_threshold: DEFAULT_SATURATION_THRESHOLD,
            resize_filter: ResizeFilter::default(),
            seed: DEFAULT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ExtractorConfig {
    pub fn with_num_colors(self, num_colors: usize) -> Self {
        Self { num_colors, ..self }
    }

    pub fn with_thresholds(self, brightness_threshold: f32, saturation_threshold: f32) -> Self {
        Self {
            brightness_threshold,
            saturation_threshold,
            ..self
        }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    pub fn with_sizes(self, resize_dims: Dimensions, small_image_size: Dimensions) -> Self {
        Self {
            resize_dims,
            small_image_size,
            ..self
        }
    }

    /// Reject values that would make the pipeline meaningless before any work is done.
    pub fn validate(&self) -> Result<()> {
        if self.num_colors == 0 || self.num_colors > MAX_NUM_COLORS {
            return Err(PaletteError::invalid("num_colors", self.num_colors));
        }

        for (parameter, value) in [
            ("brightness_threshold", self.brightness_threshold),
            ("saturation_threshold", self.saturation_threshold),
        ] {
            // NaN fails `contains`
            if !(0.0..=1.0).contains(&value) {
                return Err(PaletteError::invalid(parameter, value));
            }
        }

        for (parameter, dims) in [
            ("resize_dims", self.resize_dims),
            ("small_image_size", self.small_image_size),
        ] {
            if dims.area() == 0 || dims.area() > MAX_AREA {
                return Err(PaletteError::invalid(parameter, dims));
            }
        }

        if self.max_iterations == 0 {
            return Err(PaletteError::invalid("max_iterations", self.max_iterations));
        }

        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(PaletteError::invalid("tolerance", self.tolerance));
        }

        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PaletteError::invalid("config", e))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PaletteError::ConfigLoad {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        serde_json::from_str(&content).map_err(|e| PaletteError::ConfigLoad {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PaletteError::invalid("config", e))
    }
}
