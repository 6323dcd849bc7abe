//! Per-color usage statistics of a result buffer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::color::Color;

/// Usage of a single color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorUsage {
    pub pixel_count: u64,
    /// Share of opaque pixels, 0..=100.
    pub percent: f64,
}

/// How often each color occurs among the opaque pixels of a buffer.
///
/// Serializes as a map keyed by `"#RRGGBB"`, ordered by color value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorUsageStats {
    entries: BTreeMap<Color, ColorUsage>,
}

impl ColorUsageStats {
    /// Count the opaque (alpha > 0) pixels of `buffer` per color.
    pub fn from_buffer(buffer: &PixelBuffer) -> Self {
        let mut counts: BTreeMap<Color, u64> = BTreeMap::new();
        let mut total = 0u64;
        for color in buffer.opaque_colors() {
            *counts.entry(color).or_insert(0) += 1;
            total += 1;
        }

        let entries = counts
            .into_iter()
            .map(|(color, pixel_count)| {
                let percent = pixel_count as f64 * 100.0 / total as f64;
                (
                    color,
                    ColorUsage {
                        pixel_count,
                        percent,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Usage of `color`, if it occurs at all.
    pub fn get(&self, color: Color) -> Option<&ColorUsage> {
        self.entries.get(&color)
    }

    /// Usage share of `color`, 0.0 when absent.
    pub fn percent(&self, color: Color) -> f64 {
        self.entries.get(&color).map_or(0.0, |u| u.percent)
    }

    /// Number of distinct colors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Opaque pixels counted across all colors.
    pub fn total_pixels(&self) -> u64 {
        self.entries.values().map(|u| u.pixel_count).sum()
    }

    /// Colors in ascending packed order with their usage.
    pub fn iter(&self) -> impl Iterator<Item = (Color, &ColorUsage)> + '_ {
        self.entries.iter().map(|(&c, u)| (c, u))
    }
}

impl FromIterator<(Color, ColorUsage)> for ColorUsageStats {
    fn from_iter<I: IntoIterator<Item = (Color, ColorUsage)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
