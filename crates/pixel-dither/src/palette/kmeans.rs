//! Deterministic k-means palette extraction.
//!
//! Clustering runs in RGB over the image's distinct opaque colors, each
//! weighted by its pixel count. Seeding is spaced sampling along luma, so
//! the same image always yields the same palette.

use std::collections::{HashMap, HashSet};

use crate::buffer::PixelBuffer;
use crate::color::Color;

const DEFAULT_MAX_ITERATIONS: usize = 32;

/// Extracts a palette of at most `k` colors from an image.
#[derive(Debug, Clone)]
pub struct KMeansClusterer {
    max_iterations: usize,
}

impl Default for KMeansClusterer {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

#[inline]
fn dist_sq(a: [f64; 3], b: [f64; 3]) -> f64 {
    let d0 = a[0] - b[0];
    let d1 = a[1] - b[1];
    let d2 = a[2] - b[2];
    d0 * d0 + d1 * d1 + d2 * d2
}

fn nearest_centroid(color: [f64; 3], centroids: &[[f64; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &c) in centroids.iter().enumerate() {
        let d = dist_sq(color, c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Distinct opaque colors with pixel counts, in first-seen raster order.
fn histogram(src: &PixelBuffer) -> Vec<(Color, u64)> {
    let mut index: HashMap<Color, usize> = HashMap::new();
    let mut entries: Vec<(Color, u64)> = Vec::new();
    for color in src.opaque_colors() {
        match index.get(&color) {
            Some(&i) => entries[i].1 += 1,
            None => {
                index.insert(color, entries.len());
                entries.push((color, 1));
            }
        }
    }
    entries
}

impl KMeansClusterer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upper bound on refinement iterations (at least 1).
    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n.max(1);
        self
    }

    /// Cluster the opaque pixels of `src` into `k` representative colors.
    ///
    /// Returns the image's distinct colors unchanged when there are at most
    /// `k` of them. Otherwise returns exactly `k` unique colors, each inside
    /// the per-channel bounds of the image's opaque pixels. Returns an empty
    /// list when `k == 0` or nothing is opaque.
    ///
    /// # Example
    ///
    /// ```
    /// use pixel_dither::{KMeansClusterer, PixelBuffer};
    ///
    /// let src = PixelBuffer::from_fn(16, 16, |x, y| [(x * 16) as u8, (y * 16) as u8, 0, 255]);
    /// let colors = KMeansClusterer::new().cluster(&src, 4);
    /// assert_eq!(colors.len(), 4);
    /// ```
    pub fn cluster(&self, src: &PixelBuffer, k: usize) -> Vec<Color> {
        if k == 0 {
            return Vec::new();
        }
        let hist = histogram(src);
        if hist.len() <= k {
            tracing::debug!(
                distinct = hist.len(),
                k,
                "Image fits in k colors, skipping k-means"
            );
            return hist.into_iter().map(|(c, _)| c).collect();
        }

        let mut sorted: Vec<(Color, u64)> = hist;
        sorted.sort_by(|a, b| {
            a.0.luma()
                .total_cmp(&b.0.luma())
                .then(a.0.packed().cmp(&b.0.packed()))
        });

        let n = sorted.len();
        let points: Vec<[f64; 3]> = sorted.iter().map(|(c, _)| c.to_f64()).collect();
        let mut centroids: Vec<[f64; 3]> = (0..k).map(|i| points[i * n / k]).collect();
        let mut assignment = vec![usize::MAX; n];

        let mut iterations = 0;
        for _ in 0..self.max_iterations {
            iterations += 1;
            let mut changed = false;
            for (i, &p) in points.iter().enumerate() {
                let nearest = nearest_centroid(p, &centroids);
                if assignment[i] != nearest {
                    assignment[i] = nearest;
                    changed = true;
                }
            }
            if !changed {
                break;
            }

            let mut sums = vec![[0.0f64; 3]; k];
            let mut weights = vec![0u64; k];
            for (i, &p) in points.iter().enumerate() {
                let cluster = assignment[i];
                let w = sorted[i].1;
                weights[cluster] += w;
                for ch in 0..3 {
                    sums[cluster][ch] += p[ch] * w as f64;
                }
            }
            for (cluster, centroid) in centroids.iter_mut().enumerate() {
                // Empty clusters keep their previous centroid
                if weights[cluster] > 0 {
                    let w = weights[cluster] as f64;
                    *centroid = sums[cluster].map(|s| s / w);
                }
            }
        }
        tracing::debug!(k, distinct = n, iterations, "k-means converged");

        self.finalize(&centroids, &sorted)
    }

    /// Round centroids and replace rounding collisions with the unused image
    /// color farthest from the colors chosen so far.
    fn finalize(&self, centroids: &[[f64; 3]], sorted: &[(Color, u64)]) -> Vec<Color> {
        let mut chosen: Vec<Color> = Vec::with_capacity(centroids.len());
        let mut used: HashSet<Color> = HashSet::new();
        for &centroid in centroids {
            let rounded = Color::from_f64(centroid);
            if used.insert(rounded) {
                chosen.push(rounded);
                continue;
            }
            let replacement = sorted
                .iter()
                .map(|&(c, _)| c)
                .filter(|c| !used.contains(c))
                .map(|c| {
                    let p = c.to_f64();
                    let d = chosen
                        .iter()
                        .map(|s| dist_sq(p, s.to_f64()))
                        .fold(f64::INFINITY, f64::min);
                    (c, d)
                })
                .fold(None::<(Color, f64)>, |best, (c, d)| match best {
                    Some((_, bd)) if d <= bd => best,
                    _ => Some((c, d)),
                });
            if let Some((c, _)) = replacement {
                used.insert(c);
                chosen.push(c);
            }
        }
        chosen
    }
}
