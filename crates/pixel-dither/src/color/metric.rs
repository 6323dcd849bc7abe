//! Perceptual color-difference metrics
//!
//! Every metric is expressed as a pair of functions: [`ColorMetric::coords`]
//! maps an sRGB triple into the metric's working space, and
//! [`ColorMetric::delta`] measures the difference between two such points.
//! This lets palettes precompute their coordinates once per entry.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::lab::Lab;
use super::linear_rgb::LinearRgb;
use super::oklab::Oklab;
use super::rgb::Color;
use crate::api::ParseOptionError;

const TWO_PI: f64 = 2.0 * PI;

// CIE94, textile application constants
const CIE94_KL: f64 = 2.0;
const CIE94_K1: f64 = 0.048;
const CIE94_K2: f64 = 0.014;

// 25^7
const POW25_7: f64 = 6_103_515_625.0;

/// Color-difference metric used for palette matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMetric {
    /// Euclidean distance in CIELAB (ΔE*ab).
    Cie76,
    /// CIE94 with textile weights (kL = 2, K1 = 0.048, K2 = 0.014).
    Cie94,
    /// CIEDE2000 (ΔE00).
    Ciede2000,
    /// Euclidean distance in OKLab.
    #[default]
    Oklab,
}

impl ColorMetric {
    pub const ALL: [ColorMetric; 4] = [
        ColorMetric::Cie76,
        ColorMetric::Cie94,
        ColorMetric::Ciede2000,
        ColorMetric::Oklab,
    ];

    /// Map float sRGB channels (0.0..=255.0, clamped) into this metric's space.
    #[inline]
    pub fn coords(self, rgb: [f64; 3]) -> [f64; 3] {
        self.coords_linear(LinearRgb::from_srgb(rgb))
    }

    /// Exact coordinates of an 8-bit color.
    #[inline]
    pub fn coords_of(self, color: Color) -> [f64; 3] {
        self.coords_linear(LinearRgb::from(color))
    }

    #[inline]
    fn coords_linear(self, linear: LinearRgb) -> [f64; 3] {
        match self {
            ColorMetric::Oklab => {
                let lab = Oklab::from(linear);
                [lab.l, lab.a, lab.b]
            }
            ColorMetric::Cie76 | ColorMetric::Cie94 | ColorMetric::Ciede2000 => {
                let lab = Lab::from(linear);
                [lab.l, lab.a, lab.b]
            }
        }
    }

    /// Difference between two points produced by [`coords`](Self::coords).
    #[inline]
    pub fn delta(self, p: [f64; 3], q: [f64; 3]) -> f64 {
        match self {
            ColorMetric::Cie76 | ColorMetric::Oklab => euclidean(p, q),
            ColorMetric::Cie94 => cie94(p, q),
            ColorMetric::Ciede2000 => ciede2000(p, q),
        }
    }

    /// Distance between two colors. Symmetric, zero on identical inputs.
    ///
    /// ```
    /// use pixel_dither::{Color, ColorMetric};
    ///
    /// let red = Color::new(255, 0, 0);
    /// let blue = Color::new(0, 0, 255);
    /// let d = ColorMetric::Ciede2000.distance(red, blue);
    /// assert!(d > 10.0);
    /// assert_eq!(ColorMetric::Ciede2000.distance(red, red), 0.0);
    /// ```
    #[inline]
    pub fn distance(self, c1: Color, c2: Color) -> f64 {
        self.delta(self.coords_of(c1), self.coords_of(c2))
    }

    /// A "clearly different" separation in this metric's units.
    pub fn distinct_separation(self) -> f64 {
        match self {
            ColorMetric::Oklab => 0.1,
            _ => 10.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorMetric::Cie76 => "cie76",
            ColorMetric::Cie94 => "cie94",
            ColorMetric::Ciede2000 => "ciede2000",
            ColorMetric::Oklab => "oklab",
        }
    }
}

impl fmt::Display for ColorMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMetric {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        ColorMetric::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| ParseOptionError::new("color metric", &s))
    }
}

#[inline]
fn euclidean(p: [f64; 3], q: [f64; 3]) -> f64 {
    let d0 = p[0] - q[0];
    let d1 = p[1] - q[1];
    let d2 = p[2] - q[2];
    (d0 * d0 + d1 * d1 + d2 * d2).sqrt()
}

fn cie94(p: [f64; 3], q: [f64; 3]) -> f64 {
    let dl = p[0] - q[0];
    let c1 = (p[1] * p[1] + p[2] * p[2]).sqrt();
    let c2 = (q[1] * q[1] + q[2] * q[2]).sqrt();
    let dc = c1 - c2;

    let da = p[1] - q[1];
    let db = p[2] - q[2];
    let dh_sq = (da * da + db * db - dc * dc).max(0.0);

    // Geometric mean chroma keeps the weights symmetric in (p, q)
    let c_mean = (c1 * c2).sqrt();
    let sc = 1.0 + CIE94_K1 * c_mean;
    let sh = 1.0 + CIE94_K2 * c_mean;

    let dl_term = dl / CIE94_KL;
    let dc_term = dc / sc;
    (dl_term * dl_term + dc_term * dc_term + dh_sq / (sh * sh)).sqrt()
}

#[inline]
fn hue_angle(b: f64, a_prime: f64) -> f64 {
    if a_prime == 0.0 && b == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a_prime);
    if h < 0.0 {
        h + TWO_PI
    } else {
        h
    }
}

fn ciede2000(p: [f64; 3], q: [f64; 3]) -> f64 {
    let [l1, a1, b1] = p;
    let [l2, a2, b2] = q;

    let c1_star = (a1 * a1 + b1 * b1).sqrt();
    let c2_star = (a2 * a2 + b2 * b2).sqrt();
    let c_bar = (c1_star + c2_star) / 2.0;

    let c_bar_7 = c_bar.powi(7);
    let g = 0.5 * (1.0 - (c_bar_7 / (c_bar_7 + POW25_7)).sqrt());

    let a1_prime = a1 * (1.0 + g);
    let a2_prime = a2 * (1.0 + g);

    let c1_prime = (a1_prime * a1_prime + b1 * b1).sqrt();
    let c2_prime = (a2_prime * a2_prime + b2 * b2).sqrt();

    let h1_prime = hue_angle(b1, a1_prime);
    let h2_prime = hue_angle(b2, a2_prime);

    let dl_prime = l2 - l1;
    let dc_prime = c2_prime - c1_prime;

    let chroma_product = c1_prime * c2_prime;
    let dh_prime = if chroma_product == 0.0 {
        0.0
    } else {
        let diff = h2_prime - h1_prime;
        if diff.abs() <= PI {
            diff
        } else if diff > PI {
            diff - TWO_PI
        } else {
            diff + TWO_PI
        }
    };
    let dh_prime_big = 2.0 * chroma_product.sqrt() * (dh_prime / 2.0).sin();

    let l_bar_prime = (l1 + l2) / 2.0;
    let c_bar_prime = (c1_prime + c2_prime) / 2.0;

    let h_bar_prime = if chroma_product == 0.0 {
        h1_prime + h2_prime
    } else if (h1_prime - h2_prime).abs() <= PI {
        (h1_prime + h2_prime) / 2.0
    } else if h1_prime + h2_prime < TWO_PI {
        (h1_prime + h2_prime + TWO_PI) / 2.0
    } else {
        (h1_prime + h2_prime - TWO_PI) / 2.0
    };

    let t = 1.0 - 0.17 * (h_bar_prime - 30f64.to_radians()).cos()
        + 0.24 * (2.0 * h_bar_prime).cos()
        + 0.32 * (3.0 * h_bar_prime + 6f64.to_radians()).cos()
        - 0.20 * (4.0 * h_bar_prime - 63f64.to_radians()).cos();

    let l_mid = (l_bar_prime - 50.0) * (l_bar_prime - 50.0);
    let sl = 1.0 + 0.015 * l_mid / (20.0 + l_mid).sqrt();
    let sc = 1.0 + 0.045 * c_bar_prime;
    let sh = 1.0 + 0.015 * c_bar_prime * t;

    let h_offset = (h_bar_prime - 275f64.to_radians()) / 25f64.to_radians();
    let delta_theta = 30f64.to_radians() * (-(h_offset * h_offset)).exp();
    let c_bar_prime_7 = c_bar_prime.powi(7);
    let rc = 2.0 * (c_bar_prime_7 / (c_bar_prime_7 + POW25_7)).sqrt();
    let rt = -rc * (2.0 * delta_theta).sin();

    let dl_term = dl_prime / sl;
    let dc_term = dc_prime / sc;
    let dh_term = dh_prime_big / sh;

    (dl_term * dl_term + dc_term * dc_term + dh_term * dh_term + rt * dc_term * dh_term)
        .max(0.0)
        .sqrt()
}
