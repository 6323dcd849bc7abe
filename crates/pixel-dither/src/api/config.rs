//! Per-run engine configuration.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::color::ColorMetric;
use crate::dither::DitherMethod;
use crate::palette::{PaletteMode, PresetPalette};
use crate::preprocess::{PreprocessMethod, ResampleMethod};
use crate::quantize::ColorUsageStats;

/// A fixed palette assembled from presets and/or a custom color list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteSpec {
    pub mode: PaletteMode,
    pub presets: Vec<PresetPalette>,
    /// Free-form color list, see [`parse_palette_spec`](crate::parse_palette_spec).
    pub custom: String,
}

impl Default for PaletteSpec {
    fn default() -> Self {
        Self {
            mode: PaletteMode::Preset,
            presets: vec![PresetPalette::Pico8],
            custom: String::new(),
        }
    }
}

/// Where the working palette comes from. Clustering and fixed palettes are
/// mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaletteSource {
    Fixed(PaletteSpec),
    /// Extract `colors` colors from the image with k-means.
    Clustered {
        colors: usize,
    },
}

impl Default for PaletteSource {
    fn default() -> Self {
        PaletteSource::Fixed(PaletteSpec::default())
    }
}

/// Everything one engine run needs besides the source buffer.
///
/// Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub target_width: u32,
    pub target_height: u32,
    pub resampling: ResampleMethod,
    pub dither: DitherMethod,
    /// Percentage, 0..=100.
    pub dither_strength: u8,
    pub serpentine: bool,
    pub palette: PaletteSource,
    pub color_metric: ColorMetric,
    pub preprocessing: PreprocessMethod,
    /// Percentage, 0..=100.
    pub preprocessing_strength: u8,
    pub brightness: i32,
    pub contrast: i32,
    pub saturation: i32,
    /// Distance, in `color_metric` units, under which a pixel keeps its
    /// nearest color undithered. 0 disables.
    pub preserve_detail_threshold: f64,
    pub filter_trivial_colors: bool,
    /// Statistics of a previous run, consulted by `filter_trivial_colors`.
    pub prior_stats: ColorUsageStats,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            target_width: 64,
            target_height: 64,
            resampling: ResampleMethod::Nearest,
            dither: DitherMethod::None,
            dither_strength: 100,
            serpentine: false,
            palette: PaletteSource::default(),
            color_metric: ColorMetric::Oklab,
            preprocessing: PreprocessMethod::None,
            preprocessing_strength: 50,
            brightness: 0,
            contrast: 0,
            saturation: 0,
            preserve_detail_threshold: 0.0,
            filter_trivial_colors: false,
            prior_stats: ColorUsageStats::default(),
        }
    }
}

impl Configuration {
    /// Check every field's range. Runs before any pixel work.
    ///
    /// # Errors
    ///
    /// The first offending field, as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(ConfigError::ZeroDimensions {
                width: self.target_width,
                height: self.target_height,
            });
        }
        for (field, value) in [
            ("dither_strength", self.dither_strength),
            ("preprocessing_strength", self.preprocessing_strength),
        ] {
            if value > 100 {
                return Err(ConfigError::StrengthOutOfRange { field, value });
            }
        }
        for (field, value) in [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("saturation", self.saturation),
        ] {
            if !(-100..=100).contains(&value) {
                return Err(ConfigError::AdjustmentOutOfRange { field, value });
            }
        }
        let t = self.preserve_detail_threshold;
        if !t.is_finite() || t < 0.0 {
            return Err(ConfigError::InvalidThreshold(t));
        }
        if let PaletteSource::Clustered { colors: 0 } = self.palette {
            return Err(ConfigError::ZeroClusters);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(Configuration::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_out_of_range_fields() {
        let base = Configuration::default();
        let cases = [
            Configuration {
                target_width: 0,
                ..base.clone()
            },
            Configuration {
                dither_strength: 101,
                ..base.clone()
            },
            Configuration {
                preprocessing_strength: 255,
                ..base.clone()
            },
            Configuration {
                contrast: -101,
                ..base.clone()
            },
            Configuration {
                saturation: 500,
                ..base.clone()
            },
            Configuration {
                preserve_detail_threshold: -1.0,
                ..base.clone()
            },
            Configuration {
                preserve_detail_threshold: f64::NAN,
                ..base.clone()
            },
            Configuration {
                palette: PaletteSource::Clustered { colors: 0 },
                ..base.clone()
            },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn test_error_names_field() {
        let config = Configuration {
            brightness: 150,
            ..Configuration::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::AdjustmentOutOfRange {
                field: "brightness",
                value: 150
            })
        );
    }

    #[test]
    fn test_deserialize_partial_json() {
        let json = r##"{
            "target_width": 32,
            "target_height": 16,
            "dither": "bayer4",
            "palette": {
                "kind": "fixed",
                "mode": "merge",
                "presets": ["game_boy"],
                "custom": "#FF0000"
            },
            "color_metric": "ciede2000",
            "prior_stats": {"#FF0000": {"pixel_count": 3, "percent": 75.0}}
        }"##;
        let config: Configuration = serde_json::from_str(json).unwrap();
        assert_eq!(config.target_width, 32);
        assert_eq!(config.dither, DitherMethod::Bayer4);
        assert_eq!(config.dither_strength, 100);
        assert_eq!(config.color_metric, ColorMetric::Ciede2000);
        assert_eq!(
            config.palette,
            PaletteSource::Fixed(PaletteSpec {
                mode: PaletteMode::Merge,
                presets: vec![PresetPalette::GameBoy],
                custom: "#FF0000".into(),
            })
        );
        assert_eq!(config.prior_stats.len(), 1);
    }

    #[test]
    fn test_clustered_source_json() {
        let json = r#"{"kind": "clustered", "colors": 8}"#;
        let source: PaletteSource = serde_json::from_str(json).unwrap();
        assert_eq!(source, PaletteSource::Clustered { colors: 8 });
    }
}
