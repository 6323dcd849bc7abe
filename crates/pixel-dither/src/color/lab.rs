//! CIE 1976 L\*a\*b\* (D65)

use super::linear_rgb::LinearRgb;
use super::rgb::Color;

/// D65 reference white (2° observer), Y normalized to 1.
const WHITE_X: f64 = 0.95047;
const WHITE_Y: f64 = 1.0;
const WHITE_Z: f64 = 1.08883;

const EPSILON: f64 = 216.0 / 24389.0;
const KAPPA: f64 = 24389.0 / 27.0;

/// A color in CIELAB space, D65 white point.
///
/// `l` is 0..=100 for in-gamut colors, `a` and `b` roughly -128..=127.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    #[inline]
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    #[inline]
    pub fn chroma(self) -> f64 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

impl From<LinearRgb> for Lab {
    fn from(rgb: LinearRgb) -> Self {
        // Linear sRGB to XYZ
        let x = 0.4124564 * rgb.r + 0.3575761 * rgb.g + 0.1804375 * rgb.b;
        let y = 0.2126729 * rgb.r + 0.7151522 * rgb.g + 0.0721750 * rgb.b;
        let z = 0.0193339 * rgb.r + 0.1191920 * rgb.g + 0.9503041 * rgb.b;

        let fx = lab_f(x / WHITE_X);
        let fy = lab_f(y / WHITE_Y);
        let fz = lab_f(z / WHITE_Z);

        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

impl From<Color> for Lab {
    #[inline]
    fn from(c: Color) -> Self {
        Lab::from(LinearRgb::from(c))
    }
}
