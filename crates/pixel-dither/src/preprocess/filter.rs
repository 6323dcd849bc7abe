//! Edge-aware smoothing filters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::ParseOptionError;
use crate::buffer::PixelBuffer;
use crate::color::channel_to_u8;

/// Largest window radius, reached at strength 100.
pub const MAX_RADIUS: usize = 4;

/// Smoothing filter applied before quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreprocessMethod {
    #[default]
    None,
    /// Gaussian in space and in RGB distance.
    Bilateral,
    /// Mean of the least-varying window quadrant.
    Kuwahara,
    /// Per-channel median.
    Median,
}

impl PreprocessMethod {
    pub const ALL: [PreprocessMethod; 4] = [
        PreprocessMethod::None,
        PreprocessMethod::Bilateral,
        PreprocessMethod::Kuwahara,
        PreprocessMethod::Median,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PreprocessMethod::None => "none",
            PreprocessMethod::Bilateral => "bilateral",
            PreprocessMethod::Kuwahara => "kuwahara",
            PreprocessMethod::Median => "median",
        }
    }
}

impl fmt::Display for PreprocessMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PreprocessMethod {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == normalized)
            .ok_or_else(|| ParseOptionError::new("preprocess method", s))
    }
}

/// Window radius for a strength in 0..=100: `ceil(strength / 100 * 4)`.
pub fn radius_for_strength(strength: u8) -> usize {
    let strength = usize::from(strength.min(100));
    (strength * MAX_RADIUS).div_ceil(100)
}

/// Run `method` at `strength` (0..=100). `None` or strength 0 return a copy.
///
/// Fully transparent pixels are copied through and never used as neighbors.
/// Alpha is never filtered.
pub fn preprocess(src: &PixelBuffer, method: PreprocessMethod, strength: u8) -> PixelBuffer {
    let radius = radius_for_strength(strength);
    if method == PreprocessMethod::None || radius == 0 {
        return src.clone();
    }
    tracing::debug!(%method, strength, radius, "preprocess");

    let window = Window::new(src);
    let mut out = src.data().to_vec();
    for y in 0..window.height {
        for x in 0..window.width {
            let i = (y * window.width + x) * 4;
            if out[i + 3] == 0 {
                continue;
            }
            let rgb = match method {
                PreprocessMethod::Median => window.median(x, y, radius),
                PreprocessMethod::Bilateral => window.bilateral(x, y, radius, strength),
                PreprocessMethod::Kuwahara => window.kuwahara(x, y, radius),
                PreprocessMethod::None => continue,
            };
            out[i..i + 3].copy_from_slice(&rgb);
        }
    }
    src.with_data(out)
}

struct Window<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> Window<'a> {
    fn new(src: &'a PixelBuffer) -> Self {
        Self {
            data: src.data(),
            width: src.width() as usize,
            height: src.height() as usize,
        }
    }

    /// Opaque pixels in the clipped rectangle `x0..=x1, y0..=y1` as `(x, y, rgb)`.
    fn opaque(
        &self,
        (x0, y0): (isize, isize),
        (x1, y1): (isize, isize),
    ) -> impl Iterator<Item = (usize, usize, [u8; 3])> + '_ {
        // Callers always include an in-bounds center, so both ranges are non-empty
        let xs = x0.max(0) as usize..=x1.min(self.width as isize - 1) as usize;
        let ys = y0.max(0) as usize..=y1.min(self.height as isize - 1) as usize;
        ys.flat_map(move |y| xs.clone().map(move |x| (x, y)))
            .filter_map(move |(x, y)| {
                let i = (y * self.width + x) * 4;
                let rgb = [self.data[i], self.data[i + 1], self.data[i + 2]];
                (self.data[i + 3] > 0).then_some((x, y, rgb))
            })
    }

    fn around(
        &self,
        x: usize,
        y: usize,
        r: usize,
    ) -> impl Iterator<Item = (usize, usize, [u8; 3])> + '_ {
        let (x, y, r) = (x as isize, y as isize, r as isize);
        self.opaque((x - r, y - r), (x + r, y + r))
    }

    fn median(&self, x: usize, y: usize, r: usize) -> [u8; 3] {
        let mut channels: [Vec<u8>; 3] = Default::default();
        for (_, _, rgb) in self.around(x, y, r) {
            for c in 0..3 {
                channels[c].push(rgb[c]);
            }
        }
        let mut out = [0u8; 3];
        for c in 0..3 {
            let values = &mut channels[c];
            values.sort_unstable();
            // The center is opaque, so the window is never empty. Even counts
            // take the upper middle.
            out[c] = values[values.len() / 2];
        }
        out
    }

    fn bilateral(&self, x: usize, y: usize, r: usize, strength: u8) -> [u8; 3] {
        let sigma_s = r as f64 / 2.0 + 0.5;
        let sigma_r = 10.0 + 0.5 * f64::from(strength);
        let (two_ss, two_rr) = (2.0 * sigma_s * sigma_s, 2.0 * sigma_r * sigma_r);
        let i = (y * self.width + x) * 4;
        let center = [self.data[i], self.data[i + 1], self.data[i + 2]];

        let mut sum = [0.0f64; 3];
        let mut total = 0.0;
        for (nx, ny, rgb) in self.around(x, y, r) {
            let dx = nx as f64 - x as f64;
            let dy = ny as f64 - y as f64;
            let color_sq: f64 = (0..3)
                .map(|c| {
                    let d = f64::from(rgb[c]) - f64::from(center[c]);
                    d * d
                })
                .sum();
            let w = (-(dx * dx + dy * dy) / two_ss - color_sq / two_rr).exp();
            for c in 0..3 {
                sum[c] += w * f64::from(rgb[c]);
            }
            total += w;
        }
        let mut out = center;
        if total > 0.0 {
            for c in 0..3 {
                out[c] = channel_to_u8(sum[c] / total);
            }
        }
        out
    }

    fn kuwahara(&self, x: usize, y: usize, r: usize) -> [u8; 3] {
        let (x, y, r) = (x as isize, y as isize, r as isize);
        let quadrants = [
            ((x - r, y - r), (x, y)),
            ((x, y - r), (x + r, y)),
            ((x - r, y), (x, y + r)),
            ((x, y), (x + r, y + r)),
        ];
        let mut best: Option<(f64, [f64; 3])> = None;
        for (from, to) in quadrants {
            let mut n = 0.0;
            let mut sum = [0.0f64; 3];
            let mut sum_sq = [0.0f64; 3];
            for (_, _, rgb) in self.opaque(from, to) {
                n += 1.0;
                for c in 0..3 {
                    let v = f64::from(rgb[c]);
                    sum[c] += v;
                    sum_sq[c] += v * v;
                }
            }
            if n == 0.0 {
                continue;
            }
            let mean = [sum[0] / n, sum[1] / n, sum[2] / n];
            let variance: f64 = (0..3).map(|c| sum_sq[c] / n - mean[c] * mean[c]).sum();
            // Ties keep the earlier quadrant: NW, NE, SW, SE
            let better = match best {
                Some((v, _)) => variance < v,
                None => true,
            };
            if better {
                best = Some((variance, mean));
            }
        }
        match best {
            Some((_, mean)) => [
                channel_to_u8(mean[0]),
                channel_to_u8(mean[1]),
                channel_to_u8(mean[2]),
            ],
            None => [0, 0, 0],
        }
    }
}
