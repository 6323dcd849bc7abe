//! The subset of palette entries a quantizer may emit.

use super::stats::ColorUsageStats;
use crate::palette::Palette;

/// Minimum prior usage share (percent) for an entry to survive the
/// trivial-color filter.
pub const TRIVIAL_COLOR_PERCENT: f64 = 0.1;

/// A mask over palette indices.
///
/// Excluded entries stay in the palette (and in its ordering) but can never
/// be matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    admitted: Vec<bool>,
}

impl CandidateSet {
    /// Admit every palette entry.
    pub fn all(palette: &Palette) -> Self {
        Self {
            admitted: vec![true; palette.len()],
        }
    }

    /// Exclude entries whose share of the previous run's output is below
    /// [`TRIVIAL_COLOR_PERCENT`]. Entries missing from `prior` count as 0%.
    /// With no prior statistics every entry is admitted.
    pub fn filter_trivial(palette: &Palette, prior: &ColorUsageStats) -> Self {
        if prior.is_empty() {
            return Self::all(palette);
        }
        let admitted: Vec<bool> = palette
            .colors()
            .iter()
            .map(|&c| prior.percent(c) >= TRIVIAL_COLOR_PERCENT)
            .collect();
        tracing::debug!(
            admitted = admitted.iter().filter(|&&a| a).count(),
            palette = palette.len(),
            "Applied trivial-color filter"
        );
        Self { admitted }
    }

    /// Mask out entry `idx`. Indices past the palette are ignored.
    pub fn exclude(&mut self, idx: usize) {
        if let Some(slot) = self.admitted.get_mut(idx) {
            *slot = false;
        }
    }

    /// Whether entry `idx` may be emitted. `false` for out-of-range indices.
    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        self.admitted.get(idx).copied().unwrap_or(false)
    }

    /// Admitted indices in palette order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.admitted
            .iter()
            .enumerate()
            .filter_map(|(i, &a)| a.then_some(i))
    }

    /// Number of admitted entries.
    pub fn len(&self) -> usize {
        self.admitted.iter().filter(|&&a| a).count()
    }

    /// `true` when every entry has been excluded.
    pub fn is_empty(&self) -> bool {
        !self.admitted.iter().any(|&a| a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelBuffer;
    use crate::color::Color;
    use pretty_assertions::assert_eq;

    fn bw() -> Palette {
        Palette::new(&[Color::BLACK, Color::WHITE, Color::new(255, 0, 0)]).unwrap()
    }

    #[test]
    fn test_empty_prior_admits_all() {
        let set = CandidateSet::filter_trivial(&bw(), &ColorUsageStats::default());
        assert_eq!(set, CandidateSet::all(&bw()));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_rare_and_absent_colors_excluded() {
        // 1 white pixel in 2000 is 0.05%
        let prior = PixelBuffer::from_fn(2000, 1, |x, _| {
            if x == 0 {
                [255, 255, 255, 255]
            } else {
                [0, 0, 0, 255]
            }
        });
        let stats = ColorUsageStats::from_buffer(&prior);
        let set = CandidateSet::filter_trivial(&bw(), &stats);
        assert_eq!(set.indices().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 1 in 1000 is exactly 0.1%
        let prior = PixelBuffer::from_fn(1000, 1, |x, _| {
            if x == 0 {
                [255, 255, 255, 255]
            } else {
                [0, 0, 0, 255]
            }
        });
        let set = CandidateSet::filter_trivial(&bw(), &ColorUsageStats::from_buffer(&prior));
        assert!(set.contains(1));
        assert!(!set.contains(2));
    }

    #[test]
    fn test_exclude_and_empty() {
        let mut set = CandidateSet::all(&bw());
        set.exclude(0);
        set.exclude(1);
        assert!(!set.is_empty());
        set.exclude(2);
        set.exclude(99);
        assert!(set.is_empty());
        assert_eq!(set.indices().count(), 0);
    }
}
