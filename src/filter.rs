use crate::config::ExtractorConfig;
use crate::hls::Hls;

/// Drops pixels too dark or too gray to say anything about a painting's palette:
/// shadows, canvas edges, varnish glare.
///
/// A pixel is kept only if its lightness and saturation are both strictly above
/// the thresholds; a pixel sitting exactly on a threshold is dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerceptualFilter {
    pub brightness_threshold: f32,
    pub saturation_threshold: f32,
}

impl PerceptualFilter {
    pub fn new(brightness_threshold: f32, saturation_threshold: f32) -> Self {
        Self {
            brightness_threshold,
            saturation_threshold,
        }
    }

    pub fn is_allowed(&self, hls: &Hls) -> bool {
        hls.lightness > self.brightness_threshold && hls.saturation > self.saturation_threshold
    }

    pub fn apply(&self, pixels: impl IntoIterator<Item = Hls>) -> Vec<Hls> {
        pixels.into_iter().filter(|p| self.is_allowed(p)).collect()
    }
}

impl From<&ExtractorConfig> for PerceptualFilter {
    fn from(config: &ExtractorConfig) -> Self {
        Self::new(config.brightness_threshold, config.saturation_threshold)
    }
}
