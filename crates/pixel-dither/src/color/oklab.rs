//! Oklab perceptual color space
//!
//! Euclidean distance in Oklab tracks perceived color difference far better
//! than RGB distance, at a fraction of the CIEDE2000 cost.
//!
//! # References
//!
//! Björn Ottosson, "A perceptual color space for image processing"
//! <https://bottosson.github.io/posts/oklab/>

use super::linear_rgb::LinearRgb;
use super::rgb::Color;

/// A color in Oklab perceptual color space.
///
/// # Components
///
/// - `l`: Lightness (0.0 = black, 1.0 = white for in-gamut colors)
/// - `a`: Green-red axis (negative = green, positive = red)
/// - `b`: Blue-yellow axis (negative = blue, positive = yellow)
///
/// Values are not clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Oklab {
    #[inline]
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Euclidean distance to another Oklab color.
    #[inline]
    pub fn distance(self, other: Oklab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}

impl From<LinearRgb> for Oklab {
    /// Uses the updated 2021-01-25 matrices from Björn Ottosson.
    fn from(rgb: LinearRgb) -> Self {
        // Linear sRGB to LMS (M1)
        let l = 0.4122214708 * rgb.r + 0.5363325363 * rgb.g + 0.0514459929 * rgb.b;
        let m = 0.2119034982 * rgb.r + 0.6806995451 * rgb.g + 0.1073969566 * rgb.b;
        let s = 0.0883024619 * rgb.r + 0.2817188376 * rgb.g + 0.6299787005 * rgb.b;

        let l_ = l.cbrt();
        let m_ = m.cbrt();
        let s_ = s.cbrt();

        // LMS to Lab (M2)
        Oklab {
            l: 0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_,
            a: 1.9779984951 * l_ - 2.4285922050 * m_ + 0.4505937099 * s_,
            b: 0.0259040371 * l_ + 0.7827717662 * m_ - 0.8086757660 * s_,
        }
    }
}

impl From<Color> for Oklab {
    #[inline]
    fn from(c: Color) -> Self {
        Oklab::from(LinearRgb::from(c))
    }
}

impl From<Oklab> for LinearRgb {
    /// The result is not clamped. Out-of-gamut Oklab colors produce
    /// channels outside 0.0..=1.0.
    fn from(lab: Oklab) -> Self {
        let l_ = lab.l + 0.3963377774 * lab.a + 0.2158037573 * lab.b;
        let m_ = lab.l - 0.1055613458 * lab.a - 0.0638541728 * lab.b;
        let s_ = lab.l - 0.0894841775 * lab.a - 1.2914855480 * lab.b;

        let l = l_ * l_ * l_;
        let m = m_ * m_ * m_;
        let s = s_ * s_ * s_;

        LinearRgb {
            r: 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s,
            g: -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s,
            b: -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s,
        }
    }
}
