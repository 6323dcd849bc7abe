//! Palette gap analysis: which colors would an image benefit from most?
//!
//! Every opaque pixel votes for its 5-bit-per-channel RGB bucket with a weight
//! equal to its distance from the nearest existing palette color, so image
//! regions the palette already covers contribute little. Each bucket proposes
//! its weighted mean color.

use std::collections::HashMap;

use crate::buffer::PixelBuffer;
use crate::color::{Color, ColorMetric};
use crate::palette::dedup_colors;

const BUCKET_BITS: u32 = 5;
const BUCKETS_PER_CHANNEL: usize = 1 << BUCKET_BITS;
const BUCKET_COUNT: usize = BUCKETS_PER_CHANNEL * BUCKETS_PER_CHANNEL * BUCKETS_PER_CHANNEL;

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    weight: f64,
    sum: [f64; 3],
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    color: Color,
    weight: f64,
}

#[inline]
fn bucket_index(c: Color) -> usize {
    let shift = 8 - BUCKET_BITS;
    let (r, g, b) = (
        usize::from(c.r >> shift),
        usize::from(c.g >> shift),
        usize::from(c.b >> shift),
    );
    (r * BUCKETS_PER_CHANNEL + g) * BUCKETS_PER_CHANNEL + b
}

/// Suggests colors to add to a palette.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorSuggester {
    metric: ColorMetric,
}

impl ColorSuggester {
    pub fn new(metric: ColorMetric) -> Self {
        Self { metric }
    }

    pub fn metric(&self) -> ColorMetric {
        self.metric
    }

    /// Up to `count` colors absent from `existing`, strongest gap first.
    ///
    /// With `prefer_distinct`, each pick is penalized by its closeness to the
    /// colors already picked, trading raw weight for variety.
    pub fn suggest(
        &self,
        src: &PixelBuffer,
        existing: &[Color],
        count: usize,
        prefer_distinct: bool,
    ) -> Vec<Color> {
        if count == 0 {
            return Vec::new();
        }
        let existing = dedup_colors(existing.iter().copied());
        let candidates = self.rank_candidates(src, &existing);
        tracing::debug!(
            candidates = candidates.len(),
            existing = existing.len(),
            count,
            prefer_distinct,
            "suggest colors"
        );

        if prefer_distinct {
            self.select_distinct(candidates, count)
        } else {
            candidates
                .into_iter()
                .take(count)
                .map(|c| c.color)
                .collect()
        }
    }

    /// Bucket candidates, heaviest first, ties by bucket index.
    fn rank_candidates(&self, src: &PixelBuffer, existing: &[Color]) -> Vec<Candidate> {
        let existing_coords: Vec<[f64; 3]> = existing
            .iter()
            .map(|&c| self.metric.coords_of(c))
            .collect();
        let mut gap_cache: HashMap<Color, f64> = HashMap::new();
        let mut buckets = vec![Bucket::default(); BUCKET_COUNT];

        for color in src.opaque_colors() {
            let weight = *gap_cache.entry(color).or_insert_with(|| {
                if existing_coords.is_empty() {
                    return 1.0;
                }
                let p = self.metric.coords_of(color);
                existing_coords
                    .iter()
                    .map(|&q| self.metric.delta(p, q))
                    .fold(f64::INFINITY, f64::min)
            });
            if weight <= 0.0 {
                continue;
            }
            let bucket = &mut buckets[bucket_index(color)];
            let rgb = color.to_f64();
            bucket.weight += weight;
            for c in 0..3 {
                bucket.sum[c] += weight * rgb[c];
            }
        }

        let mut candidates: Vec<Candidate> = buckets
            .iter()
            .filter(|b| b.weight > 0.0)
            .filter_map(|b| {
                let color = Color::from_f64([
                    b.sum[0] / b.weight,
                    b.sum[1] / b.weight,
                    b.sum[2] / b.weight,
                ]);
                (!existing.contains(&color)).then_some(Candidate {
                    color,
                    weight: b.weight,
                })
            })
            .collect();
        // Stable sort keeps bucket order among equal weights
        candidates.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        candidates
    }

    fn select_distinct(&self, mut remaining: Vec<Candidate>, count: usize) -> Vec<Color> {
        let separation = self.metric.distinct_separation();
        let mut selected: Vec<Color> = Vec::with_capacity(count);

        while selected.len() < count && !remaining.is_empty() {
            let mut best = (0, f64::NEG_INFINITY);
            for (i, cand) in remaining.iter().enumerate() {
                let penalty = selected
                    .iter()
                    .map(|&s| {
                        let d = self.metric.distance(cand.color, s);
                        d / (d + separation)
                    })
                    .fold(1.0, f64::min);
                let score = cand.weight * penalty;
                if score > best.1 {
                    best = (i, score);
                }
            }
            selected.push(remaining.remove(best.0).color);
        }
        selected
    }
}
