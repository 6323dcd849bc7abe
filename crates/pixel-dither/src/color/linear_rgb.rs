//! Linear RGB color type
//!
//! Linear RGB is the space where light addition is physically accurate. It is
//! the common intermediate for the CIELAB and OKLab conversions.

use super::lut::{linear_to_srgb, srgb8_to_linear, srgb_to_linear};
use super::rgb::Color;

/// A color in linear RGB color space.
///
/// Values are typically in the range 0.0..=1.0, but may exceed it for
/// intermediate results (e.g. after a chroma boost).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl LinearRgb {
    #[inline]
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Decode float sRGB channels in 0.0..=255.0. Out-of-range channels are clamped.
    #[inline]
    pub fn from_srgb(rgb: [f64; 3]) -> Self {
        Self {
            r: srgb_to_linear(rgb[0] / 255.0),
            g: srgb_to_linear(rgb[1] / 255.0),
            b: srgb_to_linear(rgb[2] / 255.0),
        }
    }

    /// Encode back to float sRGB channels in 0.0..=255.0, clamping out-of-gamut values.
    #[inline]
    pub fn to_srgb(self) -> [f64; 3] {
        [
            linear_to_srgb(self.r) * 255.0,
            linear_to_srgb(self.g) * 255.0,
            linear_to_srgb(self.b) * 255.0,
        ]
    }
}

impl From<Color> for LinearRgb {
    fn from(c: Color) -> Self {
        Self {
            r: srgb8_to_linear(c.r),
            g: srgb8_to_linear(c.g),
            b: srgb8_to_linear(c.b),
        }
    }
}
