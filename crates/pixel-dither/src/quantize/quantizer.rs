//! Nearest-palette-entry mapping.

use super::candidates::CandidateSet;
use super::stats::ColorUsageStats;
use super::QuantizeError;
use crate::buffer::PixelBuffer;
use crate::color::{Color, ColorMetric};
use crate::palette::Palette;

/// Maps pixels to the nearest admitted palette entry under a metric.
///
/// Ties resolve to the earliest palette index. Fully transparent pixels are
/// never matched and pass through unchanged.
#[derive(Debug, Clone)]
pub struct Quantizer<'a> {
    palette: &'a Palette,
    metric: ColorMetric,
    preserve_detail_threshold: f64,
    admitted: Vec<usize>,
}

impl<'a> Quantizer<'a> {
    /// # Errors
    ///
    /// [`QuantizeError::EmptyCandidateSet`] if `candidates` admits no entry.
    pub fn new(
        palette: &'a Palette,
        metric: ColorMetric,
        preserve_detail_threshold: f64,
        candidates: &CandidateSet,
    ) -> Result<Self, QuantizeError> {
        let admitted: Vec<usize> = candidates
            .indices()
            .filter(|&i| i < palette.len())
            .collect();
        if admitted.is_empty() {
            return Err(QuantizeError::EmptyCandidateSet {
                palette_len: palette.len(),
            });
        }
        Ok(Self {
            palette,
            metric,
            preserve_detail_threshold: preserve_detail_threshold.max(0.0),
            admitted,
        })
    }

    /// The palette indices returned by this quantizer point into.
    #[inline]
    pub fn palette(&self) -> &Palette {
        self.palette
    }

    /// Metric used for every distance comparison.
    #[inline]
    pub fn metric(&self) -> ColorMetric {
        self.metric
    }

    /// Distance at or below which a pixel keeps its nearest entry undithered.
    /// 0 disables detail preservation.
    #[inline]
    pub fn preserve_detail_threshold(&self) -> f64 {
        self.preserve_detail_threshold
    }

    /// Number of entries the quantizer may emit.
    #[inline]
    pub fn candidate_count(&self) -> usize {
        self.admitted.len()
    }

    #[inline]
    fn nearest_point(&self, point: [f64; 3]) -> (usize, f64) {
        // `admitted` is non-empty by construction
        let mut best = (self.admitted[0], f64::INFINITY);
        for &i in &self.admitted {
            let entry = self.palette.coords(self.metric, i);
            let d = self.metric.delta(point, entry);
            if d < best.1 {
                best = (i, d);
            }
        }
        best
    }

    /// Nearest admitted entry for an exact color: `(index, distance)`.
    #[inline]
    pub fn nearest_color(&self, color: Color) -> (usize, f64) {
        self.nearest_point(self.metric.coords_of(color))
    }

    /// Nearest admitted entry for float sRGB channels (0.0..=255.0).
    #[inline]
    pub fn nearest_rgb(&self, rgb: [f64; 3]) -> (usize, f64) {
        self.nearest_point(self.metric.coords(rgb))
    }

    /// The entry `color` snaps to without dithering, if it already lies
    /// within the detail threshold of one.
    ///
    /// Returns `None` without searching the palette when the threshold is 0.
    #[inline]
    pub fn preserved_nearest(&self, color: Color) -> Option<usize> {
        if self.preserve_detail_threshold <= 0.0 {
            return None;
        }
        let (idx, distance) = self.nearest_color(color);
        (distance <= self.preserve_detail_threshold).then_some(idx)
    }

    /// Snap every opaque pixel to its nearest admitted entry, keeping alpha.
    pub fn quantize(&self, src: &PixelBuffer) -> (PixelBuffer, ColorUsageStats) {
        let mut out = Vec::with_capacity(src.data().len());
        for p in src.pixels() {
            if p[3] == 0 {
                out.extend_from_slice(&p);
                continue;
            }
            let (idx, _) = self.nearest_color(Color::new(p[0], p[1], p[2]));
            let c = self.palette.color(idx);
            out.extend_from_slice(&[c.r, c.g, c.b, p[3]]);
        }
        let result = src.with_data(out);
        let stats = ColorUsageStats::from_buffer(&result);
        (result, stats)
    }
}
