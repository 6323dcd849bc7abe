//! Resampling to a target size.
//!
//! Bilinear and Lanczos run as two separable passes over premultiplied
//! samples with precomputed, normalized weights per output position. Nearest
//! uses pure integer arithmetic.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::ParseOptionError;
use crate::buffer::PixelBuffer;
use crate::color::channel_to_u8;

const LANCZOS_A: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleMethod {
    /// Point sampling at pixel centers.
    #[default]
    Nearest,
    Bilinear,
    /// Lanczos, a = 3.
    Lanczos,
}

impl ResampleMethod {
    pub const ALL: [ResampleMethod; 3] = [
        ResampleMethod::Nearest,
        ResampleMethod::Bilinear,
        ResampleMethod::Lanczos,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResampleMethod::Nearest => "nearest",
            ResampleMethod::Bilinear => "bilinear",
            ResampleMethod::Lanczos => "lanczos",
        }
    }

    /// `(support, widens_on_downscale)`
    fn support(self) -> (f64, bool) {
        match self {
            ResampleMethod::Nearest => (0.5, false),
            ResampleMethod::Bilinear => (1.0, false),
            ResampleMethod::Lanczos => (LANCZOS_A, true),
        }
    }

    fn eval(self, x: f64) -> f64 {
        match self {
            ResampleMethod::Nearest => {
                if x.abs() <= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            ResampleMethod::Bilinear => (1.0 - x.abs()).max(0.0),
            ResampleMethod::Lanczos => lanczos3(x),
        }
    }
}

impl fmt::Display for ResampleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResampleMethod {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == normalized)
            .ok_or_else(|| ParseOptionError::new("resampling method", s))
    }
}

#[inline]
fn lanczos3(x: f64) -> f64 {
    if x.abs() < 1e-12 {
        1.0
    } else if x.abs() >= LANCZOS_A {
        0.0
    } else {
        let pi_x = PI * x;
        let pi_x_a = pi_x / LANCZOS_A;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    }
}

/// Scale `src` to `width` x `height`.
///
/// Equal dimensions return an exact copy. An empty source yields a fully
/// transparent buffer.
///
/// # Panics
///
/// Panics if `width` or `height` is zero.
pub fn resample(src: &PixelBuffer, width: u32, height: u32, method: ResampleMethod) -> PixelBuffer {
    assert!(
        width > 0 && height > 0,
        "resample target must be non-zero, got {width}x{height}"
    );
    if (width, height) == (src.width(), src.height()) {
        return src.clone();
    }
    if src.pixel_count() == 0 {
        return PixelBuffer::filled(width, height, [0, 0, 0, 0]);
    }
    tracing::debug!(
        from_width = src.width(),
        from_height = src.height(),
        width,
        height,
        %method,
        "resample"
    );
    match method {
        ResampleMethod::Nearest => nearest(src, width, height),
        ResampleMethod::Bilinear | ResampleMethod::Lanczos => separable(src, width, height, method),
    }
}

fn nearest(src: &PixelBuffer, width: u32, height: u32) -> PixelBuffer {
    let (sw, sh) = (u64::from(src.width()), u64::from(src.height()));
    let (tw, th) = (u64::from(width), u64::from(height));
    let columns: Vec<u32> = (0..tw).map(|x| ((2 * x + 1) * sw / (2 * tw)) as u32).collect();
    PixelBuffer::from_fn(width, height, |x, y| {
        let sy = ((2 * u64::from(y) + 1) * sh / (2 * th)) as u32;
        src.pixel(columns[x as usize], sy)
    })
}

/// Taps for one output position: weights over `start..start + weights.len()`.
struct Taps {
    start: usize,
    weights: Vec<f64>,
}

fn precompute_taps(src_len: usize, dst_len: usize, method: ResampleMethod) -> Vec<Taps> {
    let scale = src_len as f64 / dst_len as f64;
    let (support, widens) = method.support();
    let filter_scale = if widens { scale.max(1.0) } else { 1.0 };
    let radius = (support * filter_scale).ceil() as isize;

    (0..dst_len)
        .map(|i| {
            let pos = (i as f64 + 0.5) * scale - 0.5;
            let center = pos.floor() as isize;
            let start = (center - radius).max(0) as usize;
            let end = ((center + radius).max(0) as usize).min(src_len - 1);

            let mut weights: Vec<f64> = (start..=end)
                .map(|s| method.eval((pos - s as f64) / filter_scale))
                .collect();
            let sum: f64 = weights.iter().sum();
            if sum.abs() > 1e-12 {
                for w in &mut weights {
                    *w /= sum;
                }
                Taps { start, weights }
            } else {
                // Past the edge: take the closest sample
                let closest = pos.round().clamp(0.0, (src_len - 1) as f64) as usize;
                Taps {
                    start: closest,
                    weights: vec![1.0],
                }
            }
        })
        .collect()
}

fn premultiply(px: [u8; 4]) -> [f64; 4] {
    let a = f64::from(px[3]);
    let k = a / 255.0;
    [
        f64::from(px[0]) * k,
        f64::from(px[1]) * k,
        f64::from(px[2]) * k,
        a,
    ]
}

fn unpremultiply(px: [f64; 4]) -> [u8; 4] {
    let alpha = channel_to_u8(px[3]);
    if alpha == 0 {
        return [0, 0, 0, 0];
    }
    let k = 255.0 / px[3].clamp(1e-9, 255.0);
    [
        channel_to_u8(px[0] * k),
        channel_to_u8(px[1] * k),
        channel_to_u8(px[2] * k),
        alpha,
    ]
}

fn separable(src: &PixelBuffer, width: u32, height: u32, method: ResampleMethod) -> PixelBuffer {
    let (sw, sh) = (src.width() as usize, src.height() as usize);
    let (tw, th) = (width as usize, height as usize);
    let samples: Vec<[f64; 4]> = src.pixels().map(premultiply).collect();

    let horizontal = if tw == sw {
        samples
    } else {
        let taps = precompute_taps(sw, tw, method);
        let mut out = vec![[0.0; 4]; tw * sh];
        for y in 0..sh {
            let row = &samples[y * sw..(y + 1) * sw];
            for (x, t) in taps.iter().enumerate() {
                out[y * tw + x] = weighted(t, |s| row[s]);
            }
        }
        out
    };

    let vertical = if th == sh {
        horizontal
    } else {
        let taps = precompute_taps(sh, th, method);
        let mut out = vec![[0.0; 4]; tw * th];
        for (y, t) in taps.iter().enumerate() {
            for x in 0..tw {
                out[y * tw + x] = weighted(t, |s| horizontal[s * tw + x]);
            }
        }
        out
    };

    PixelBuffer::from_fn(width, height, |x, y| {
        unpremultiply(vertical[y as usize * tw + x as usize])
    })
}

#[inline]
fn weighted(taps: &Taps, sample: impl Fn(usize) -> [f64; 4]) -> [f64; 4] {
    let mut acc = [0.0; 4];
    for (k, &w) in taps.weights.iter().enumerate() {
        let s = sample(taps.start + k);
        for c in 0..4 {
            acc[c] += w * s[c];
        }
    }
    acc
}
