//! Hue/lightness/saturation pixels, and the conversions in and out of them.
//!
//! All three components live in `[0, 1]`; hue is the fraction of a full turn
//! starting at red. Clustering treats an `Hls` as a plain point in the unit
//! cube, so hue does not wrap.

use palette::{FromColor, Hsl, IntoColor, RgbHue, Srgb};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Hls {
    pub hue: f32,
    pub lightness: f32,
    pub saturation: f32,
}

impl Hls {
    pub const fn new(hue: f32, lightness: f32, saturation: f32) -> Self {
        Self {
            hue,
            lightness,
            saturation,
        }
    }

    /// Convert an 8-bit sRGB triple. Channels are normalized to `[0, 1]` and
    /// used as-is, without linearization.
    pub fn from_rgb([r, g, b]: [u8; 3]) -> Self {
        let rgb: Srgb<f32> = Srgb::new(r, g, b).into_format();
        let hsl: Hsl = rgb.into_color();

        Self {
            hue: hsl.hue.into_positive_degrees() / 360.0,
            lightness: hsl.lightness,
            saturation: hsl.saturation,
        }
    }

    /// Inverse of [`Hls::from_rgb`]. Channels are rounded, then clamped to `[0, 255]`.
    pub fn to_rgb(self) -> [u8; 3] {
        let hsl: Hsl = Hsl::new(
            RgbHue::from_degrees(self.hue * 360.0),
            self.saturation,
            self.lightness,
        );
        let rgb: Srgb<f32> = Srgb::from_color(hsl);

        [to_channel(rgb.red), to_channel(rgb.green), to_channel(rgb.blue)]
    }

    /// `#rrggbb`, lowercase.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub(crate) fn distance_squared(&self, other: &Hls) -> f32 {
        let dh = self.hue - other.hue;
        let dl = self.lightness - other.lightness;
        let ds = self.saturation - other.saturation;
        dh * dh + dl * dl + ds * ds
    }
}

fn to_channel(c: f32) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}
