//! Dithering: error diffusion and ordered/pattern thresholding.
//!
//! Both families perturb the quantizer's per-pixel decision and always
//! store a real palette entry. Error diffusion carries each pixel's residual
//! forward to its unvisited neighbors; ordered methods offset each pixel by
//! a position-dependent threshold before matching.
//!
//! # Example
//!
//! ```
//! use pixel_dither::{
//!     CandidateSet, ColorMetric, DitherMethod, Ditherer, Palette, PixelBuffer, Quantizer,
//! };
//!
//! let palette = Palette::from_hex(&["#000000", "#FFFFFF"]).unwrap();
//! let candidates = CandidateSet::all(&palette);
//! let quantizer = Quantizer::new(&palette, ColorMetric::Oklab, 0.0, &candidates).unwrap();
//!
//! let gray = PixelBuffer::filled(8, 8, [128, 128, 128, 255]);
//! let out = Ditherer::new(DitherMethod::FloydSteinberg, 100).dither(&gray, &quantizer);
//! assert!(out.pixels().any(|p| p[0] == 0) && out.pixels().any(|p| p[0] == 255));
//! ```

mod kernel;
mod threshold;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::ParseOptionError;
use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::quantize::Quantizer;

pub use kernel::{Kernel, BURKES, FLOYD_STEINBERG, SIERRA_LITE, SIERRA_TWO_ROW, STUCKI};
pub use threshold::ordered_threshold;

/// Dithering method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DitherMethod {
    /// Plain nearest-color quantization.
    #[default]
    None,
    FloydSteinberg,
    Burkes,
    Stucki,
    /// Sierra two-row.
    Sierra2,
    SierraLite,
    /// 4×4 Bayer matrix.
    Bayer4,
    /// 8×8 Bayer matrix.
    Bayer8,
    /// 8×8 clustered-dot screen.
    Halftone,
    DiagonalLines,
    CrossHatch,
    Grid,
}

impl DitherMethod {
    pub const ALL: [DitherMethod; 12] = [
        DitherMethod::None,
        DitherMethod::FloydSteinberg,
        DitherMethod::Burkes,
        DitherMethod::Stucki,
        DitherMethod::Sierra2,
        DitherMethod::SierraLite,
        DitherMethod::Bayer4,
        DitherMethod::Bayer8,
        DitherMethod::Halftone,
        DitherMethod::DiagonalLines,
        DitherMethod::CrossHatch,
        DitherMethod::Grid,
    ];

    /// Diffusion kernel, for error-diffusion methods.
    pub fn kernel(self) -> Option<&'static Kernel> {
        match self {
            DitherMethod::FloydSteinberg => Some(&FLOYD_STEINBERG),
            DitherMethod::Burkes => Some(&BURKES),
            DitherMethod::Stucki => Some(&STUCKI),
            DitherMethod::Sierra2 => Some(&SIERRA_TWO_ROW),
            DitherMethod::SierraLite => Some(&SIERRA_LITE),
            _ => None,
        }
    }

    pub fn is_ordered(self) -> bool {
        ordered_threshold(self, 0, 0).is_some()
    }

    pub fn name(self) -> &'static str {
        match self {
            DitherMethod::None => "none",
            DitherMethod::FloydSteinberg => "floyd_steinberg",
            DitherMethod::Burkes => "burkes",
            DitherMethod::Stucki => "stucki",
            DitherMethod::Sierra2 => "sierra2",
            DitherMethod::SierraLite => "sierra_lite",
            DitherMethod::Bayer4 => "bayer4",
            DitherMethod::Bayer8 => "bayer8",
            DitherMethod::Halftone => "halftone",
            DitherMethod::DiagonalLines => "diagonal_lines",
            DitherMethod::CrossHatch => "cross_hatch",
            DitherMethod::Grid => "grid",
        }
    }
}

impl fmt::Display for DitherMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DitherMethod {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|m| m.name() == normalized)
            .ok_or_else(|| ParseOptionError::new("dither method", s))
    }
}

/// Error buffer for error diffusion.
///
/// A sliding window of `max_dy + 1` rows: `rows[0]` is the current row.
#[derive(Debug)]
pub struct ErrorBuffer {
    rows: Vec<Vec<[f64; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth.max(1)).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    /// Error accumulated so far for `x` in the current row.
    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f64; 3] {
        self.rows[0][x]
    }

    /// Add `error` to `(x, row_offset)`. Out-of-bounds targets are ignored.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f64; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            let cell = &mut self.rows[row_offset][x];
            for c in 0..3 {
                cell[c] += error[c];
            }
        }
    }

    /// Drop the current row and open a zeroed one at the bottom.
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }

    /// Spread `residual` from column `x` of the current row over `kernel`.
    ///
    /// Each neighbor gets `residual * weight / divisor`. `dx` is mirrored when
    /// `reverse` is set. Targets outside the row, or for which
    /// `accepts(nx, dy)` is false, receive nothing.
    pub fn diffuse(
        &mut self,
        kernel: &Kernel,
        x: usize,
        reverse: bool,
        residual: [f64; 3],
        accepts: impl Fn(usize, usize) -> bool,
    ) {
        let divisor = f64::from(kernel.divisor);
        for &(dx, dy, weight) in kernel.entries {
            let dx = if reverse { -dx } else { dx };
            let Some(nx) = x.checked_add_signed(dx as isize) else {
                continue;
            };
            let dy = dy as usize;
            if nx >= self.width || !accepts(nx, dy) {
                continue;
            }
            let w = f64::from(weight) / divisor;
            self.add_error(nx, dy, residual.map(|r| r * w));
        }
    }
}

/// Applies a [`DitherMethod`] on top of a [`Quantizer`].
#[derive(Debug, Clone, Copy)]
pub struct Ditherer {
    method: DitherMethod,
    strength: u8,
    serpentine: bool,
}

impl Ditherer {
    /// `strength` is a percentage; values above 100 are clamped.
    pub fn new(method: DitherMethod, strength: u8) -> Self {
        Self {
            method,
            strength: strength.min(100),
            serpentine: false,
        }
    }

    /// Alternate scan direction on odd rows (error diffusion only).
    pub fn serpentine(mut self, serpentine: bool) -> Self {
        self.serpentine = serpentine;
        self
    }

    pub fn method(&self) -> DitherMethod {
        self.method
    }

    /// Strength percentage after clamping.
    pub fn strength(&self) -> u8 {
        self.strength
    }

    /// Quantize `src` with dithering. Every opaque output pixel is an entry
    /// the quantizer admits; alpha is preserved.
    pub fn dither(&self, src: &PixelBuffer, quantizer: &Quantizer<'_>) -> PixelBuffer {
        if self.method == DitherMethod::None || self.strength == 0 {
            return quantizer.quantize(src).0;
        }
        let scale = f64::from(self.strength) / 100.0;
        if let Some(kernel) = self.method.kernel() {
            tracing::debug!(
                method = %self.method,
                scale,
                serpentine = self.serpentine,
                "error diffusion"
            );
            return self.diffuse(src, quantizer, kernel, scale);
        }
        tracing::debug!(method = %self.method, scale, "ordered dither");
        self.ordered(src, quantizer, scale)
    }

    fn diffuse(
        &self,
        src: &PixelBuffer,
        quantizer: &Quantizer<'_>,
        kernel: &Kernel,
        scale: f64,
    ) -> PixelBuffer {
        let width = src.width() as usize;
        let height = src.height() as usize;
        let data = src.data();
        let palette = quantizer.palette();
        let mut out = data.to_vec();
        let mut errors = ErrorBuffer::new(width, kernel.max_dy + 1);

        for y in 0..height {
            let reverse = self.serpentine && y % 2 == 1;
            for step in 0..width {
                let x = if reverse { width - 1 - step } else { step };
                let i = (y * width + x) * 4;
                if data[i + 3] == 0 {
                    continue;
                }
                let source = Color::new(data[i], data[i + 1], data[i + 2]);

                if let Some(nearest) = quantizer.preserved_nearest(source) {
                    // Protected pixel: commit and absorb incoming error
                    write_rgb(&mut out[i..i + 3], palette.color(nearest));
                    continue;
                }

                let acc = errors.get_accumulated(x);
                let base = source.to_f64();
                let working = [
                    (base[0] + acc[0]).clamp(0.0, 255.0),
                    (base[1] + acc[1]).clamp(0.0, 255.0),
                    (base[2] + acc[2]).clamp(0.0, 255.0),
                ];
                let (idx, _) = quantizer.nearest_rgb(working);
                let chosen = palette.color(idx);
                write_rgb(&mut out[i..i + 3], chosen);

                let c = chosen.to_f64();
                let residual = [
                    (working[0] - c[0]) * scale,
                    (working[1] - c[1]) * scale,
                    (working[2] - c[2]) * scale,
                ];
                errors.diffuse(kernel, x, reverse, residual, |nx, dy| {
                    // Transparent neighbors never receive error
                    let ny = y + dy;
                    ny < height && data[(ny * width + nx) * 4 + 3] != 0
                });
            }
            errors.advance_row();
        }
        src.with_data(out)
    }

    fn ordered(&self, src: &PixelBuffer, quantizer: &Quantizer<'_>, scale: f64) -> PixelBuffer {
        let width = src.width() as usize;
        let palette = quantizer.palette();
        let spread = 256.0 / (palette.len() as f64).cbrt() * scale;
        let mut out = src.data().to_vec();

        for (n, px) in out.chunks_exact_mut(4).enumerate() {
            if px[3] == 0 {
                continue;
            }
            let source = Color::new(px[0], px[1], px[2]);
            if let Some(nearest) = quantizer.preserved_nearest(source) {
                write_rgb(&mut px[..3], palette.color(nearest));
                continue;
            }
            let (x, y) = (n % width, n / width);
            let offset = ordered_threshold(self.method, x, y).unwrap_or(0.0) * spread;
            let base = source.to_f64();
            let (idx, _) = quantizer.nearest_rgb([
                base[0] + offset,
                base[1] + offset,
                base[2] + offset,
            ]);
            write_rgb(&mut px[..3], palette.color(idx));
        }
        src.with_data(out)
    }
}

#[inline]
fn write_rgb(dst: &mut [u8], color: Color) {
    dst[0] = color.r;
    dst[1] = color.g;
    dst[2] = color.b;
}
