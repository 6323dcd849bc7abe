//! Ordered palette with precomputed perceptual coordinates.

use std::collections::HashSet;

use super::error::PaletteError;
use crate::color::{Color, ColorMetric, Lab, Oklab};

/// An ordered set of unique colors.
///
/// Insertion order is the display order and the tie-break order: when two
/// entries are equally distant from a pixel, the earlier one wins.
///
/// CIELAB and OKLab coordinates are computed once per entry at construction,
/// which keeps per-pixel matching to a linear scan of plain float triples.
///
/// # Example
///
/// ```
/// use pixel_dither::{Color, ColorMetric, Palette};
///
/// let palette = Palette::new(&[Color::BLACK, Color::WHITE]).unwrap();
/// let dark = ColorMetric::Oklab.coords_of(Color::new(40, 40, 40));
/// let (idx, _) = palette.find_nearest(ColorMetric::Oklab, dark);
/// assert_eq!(idx, 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
    lab: Vec<[f64; 3]>,
    oklab: Vec<[f64; 3]>,
}

impl Palette {
    /// Create a palette from unique colors.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyPalette`] if `colors` is empty
    /// - [`PaletteError::DuplicateColor`] if a color appears twice
    pub fn new(colors: &[Color]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }

        let mut seen = HashSet::new();
        for (index, &color) in colors.iter().enumerate() {
            if !seen.insert(color) {
                return Err(PaletteError::DuplicateColor { color, index });
            }
        }

        let lab = colors
            .iter()
            .map(|&c| {
                let lab = Lab::from(c);
                [lab.l, lab.a, lab.b]
            })
            .collect();
        let oklab = colors
            .iter()
            .map(|&c| {
                let lab = Oklab::from(c);
                [lab.l, lab.a, lab.b]
            })
            .collect();

        Ok(Self {
            colors: colors.to_vec(),
            lab,
            oklab,
        })
    }

    /// Create a palette keeping the first occurrence of each color.
    ///
    /// # Errors
    ///
    /// [`PaletteError::EmptyPalette`] if no colors are given.
    pub fn deduplicated(colors: impl IntoIterator<Item = Color>) -> Result<Self, PaletteError> {
        Self::new(&dedup_colors(colors))
    }

    /// Create a palette from hex strings such as `"#FF0000"` or `"#F00"`.
    pub fn from_hex(colors: &[&str]) -> Result<Self, PaletteError> {
        let parsed = colors
            .iter()
            .map(|s| s.parse::<Color>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&parsed)
    }

    /// Number of entries, at least 1.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false` for a constructed palette.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Entries in insertion order.
    #[inline]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Entry at `idx`.
    ///
    /// # Panics
    ///
    /// If `idx >= self.len()`.
    #[inline]
    pub fn color(&self, idx: usize) -> Color {
        self.colors[idx]
    }

    /// Index of an exact match for `color`.
    pub fn index_of(&self, color: Color) -> Option<usize> {
        self.colors.iter().position(|&c| c == color)
    }

    pub fn contains(&self, color: Color) -> bool {
        self.index_of(color).is_some()
    }

    /// Precomputed coordinates of entry `idx` in `metric`'s space.
    #[inline]
    pub fn coords(&self, metric: ColorMetric, idx: usize) -> [f64; 3] {
        match metric {
            ColorMetric::Oklab => self.oklab[idx],
            ColorMetric::Cie76 | ColorMetric::Cie94 | ColorMetric::Ciede2000 => self.lab[idx],
        }
    }

    /// Nearest entry to a point in `metric`'s space, over the whole palette.
    ///
    /// Ties resolve to the lowest index.
    #[inline]
    pub fn find_nearest(&self, metric: ColorMetric, point: [f64; 3]) -> (usize, f64) {
        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;
        for i in 0..self.len() {
            let dist = metric.delta(point, self.coords(metric, i));
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }
        (best_idx, best_dist)
    }
}

/// Drop repeated colors, keeping first occurrences in order.
pub fn dedup_colors(colors: impl IntoIterator<Item = Color>) -> Vec<Color> {
    let mut seen = HashSet::new();
    colors.into_iter().filter(|&c| seen.insert(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_basic_construction() {
        let palette = Palette::new(&[Color::BLACK, Color::WHITE, Color::new(255, 0, 0)]).unwrap();
        assert_eq!(palette.len(), 3);
        assert!(!palette.is_empty());
        assert_eq!(palette.index_of(Color::new(255, 0, 0)), Some(2));
    }

    #[test]
    fn test_empty_error() {
        assert_eq!(Palette::new(&[]), Err(PaletteError::EmptyPalette));
        assert_eq!(
            Palette::deduplicated(Vec::new()),
            Err(PaletteError::EmptyPalette)
        );
    }

    #[test]
    fn test_duplicate_error() {
        let err = Palette::new(&[Color::BLACK, Color::WHITE, Color::BLACK]).unwrap_err();
        assert_eq!(
            err,
            PaletteError::DuplicateColor {
                color: Color::BLACK,
                index: 2
            }
        );
    }

    #[test]
    fn test_deduplicated_keeps_first_occurrence() {
        let red = Color::new(255, 0, 0);
        let palette = Palette::deduplicated([red, Color::BLACK, red, Color::WHITE]).unwrap();
        assert_eq!(palette.colors(), &[red, Color::BLACK, Color::WHITE]);
    }

    #[test]
    fn test_find_nearest_exact_match() {
        let palette = Palette::from_hex(&["#000000", "#FFFFFF", "#FF0000"]).unwrap();
        for metric in ColorMetric::ALL {
            let p = metric.coords_of(Color::new(255, 0, 0));
            let (idx, dist) = palette.find_nearest(metric, p);
            assert_eq!(idx, 2, "{metric}");
            assert_eq!(dist, 0.0);
        }
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(matches!(
            Palette::from_hex(&["#000000", "#GG0000"]),
            Err(PaletteError::ParseColor(_))
        ));
    }
}
