//! The full pipeline behind one entry point.

use super::config::{Configuration, PaletteSource};
use super::error::{EmptyPaletteCause, EngineError};
use crate::buffer::PixelBuffer;
use crate::color::{Color, ColorMetric};
use crate::dither::Ditherer;
use crate::palette::{build_palette, KMeansClusterer, Palette};
use crate::preprocess::{adjust, preprocess, resample};
use crate::quantize::{CandidateSet, ColorUsageStats, Quantizer};
use crate::suggest::ColorSuggester;

/// Result of [`Engine::process`].
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    /// Quantized RGBA at the target size.
    pub buffer: PixelBuffer,
    /// The extracted palette, when the configuration asked for clustering.
    pub generated_palette: Option<Vec<Color>>,
    /// Color usage of `buffer`.
    pub stats: ColorUsageStats,
}

/// Stateless pipeline runner.
///
/// ```
/// use pixel_dither::{
///     Configuration, Engine, PaletteMode, PaletteSource, PaletteSpec, PixelBuffer,
/// };
///
/// let config = Configuration {
///     target_width: 2,
///     target_height: 2,
///     palette: PaletteSource::Fixed(PaletteSpec {
///         mode: PaletteMode::Custom,
///         presets: Vec::new(),
///         custom: "#000000 #FFFFFF".into(),
///     }),
///     ..Configuration::default()
/// };
/// let source = PixelBuffer::filled(4, 4, [250, 250, 250, 255]);
/// let output = Engine::new().process(&source, &config).unwrap();
/// assert!(output.buffer.pixels().all(|p| p == [255, 255, 255, 255]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    clusterer: KMeansClusterer,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom k-means configuration for clustered palettes.
    pub fn with_clusterer(clusterer: KMeansClusterer) -> Self {
        Self { clusterer }
    }

    /// Run every stage on `src`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidConfiguration`] before any pixel work
    /// - [`EngineError::EmptyPalette`] when no palette entry can be matched
    pub fn process(
        &self,
        src: &PixelBuffer,
        config: &Configuration,
    ) -> Result<EngineOutput, EngineError> {
        config.validate()?;
        tracing::debug!(
            width = src.width(),
            height = src.height(),
            target_width = config.target_width,
            target_height = config.target_height,
            "Processing image"
        );

        let adjusted = adjust(src, config.brightness, config.contrast, config.saturation);
        let filtered = preprocess(
            &adjusted,
            config.preprocessing,
            config.preprocessing_strength,
        );
        let resized = resample(
            &filtered,
            config.target_width,
            config.target_height,
            config.resampling,
        );

        let (palette, generated_palette) = self.working_palette(&resized, &config.palette)?;

        let candidates = if config.filter_trivial_colors {
            CandidateSet::filter_trivial(&palette, &config.prior_stats)
        } else {
            CandidateSet::all(&palette)
        };
        tracing::debug!(
            palette = palette.len(),
            candidates = candidates.len(),
            metric = %config.color_metric,
            "Matching palette"
        );
        let quantizer = Quantizer::new(
            &palette,
            config.color_metric,
            config.preserve_detail_threshold,
            &candidates,
        )?;

        let buffer = Ditherer::new(config.dither, config.dither_strength)
            .serpentine(config.serpentine)
            .dither(&resized, &quantizer);
        let stats = ColorUsageStats::from_buffer(&buffer);
        tracing::debug!(
            colors = stats.len(),
            pixels = stats.total_pixels(),
            "Processed image"
        );

        Ok(EngineOutput {
            buffer,
            generated_palette,
            stats,
        })
    }

    fn working_palette(
        &self,
        image: &PixelBuffer,
        source: &PaletteSource,
    ) -> Result<(Palette, Option<Vec<Color>>), EngineError> {
        match source {
            PaletteSource::Fixed(spec) => {
                let palette = build_palette(spec.mode, &spec.presets, &spec.custom)?;
                Ok((palette, None))
            }
            PaletteSource::Clustered { colors } => {
                let extracted = self.clusterer.cluster(image, *colors);
                if extracted.is_empty() {
                    let cause = EmptyPaletteCause::NothingToCluster;
                    return Err(EngineError::EmptyPalette(cause));
                }
                tracing::debug!(k = colors, extracted = extracted.len(), "Clustered palette");
                let palette = Palette::new(&extracted)?;
                Ok((palette, Some(extracted)))
            }
        }
    }

    /// Propose up to `count` colors to add to `existing`.
    pub fn suggest(
        &self,
        src: &PixelBuffer,
        existing: &[Color],
        metric: ColorMetric,
        count: usize,
        prefer_distinct: bool,
    ) -> Vec<Color> {
        ColorSuggester::new(metric).suggest(src, existing, count, prefer_distinct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ConfigError, PaletteSpec};
    use crate::palette::{PaletteMode, PresetPalette};
    use pretty_assertions::assert_eq;

    fn custom(spec: &str) -> PaletteSource {
        PaletteSource::Fixed(PaletteSpec {
            mode: PaletteMode::Custom,
            presets: Vec::new(),
            custom: spec.into(),
        })
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let config = Configuration {
            target_height: 0,
            ..Configuration::default()
        };
        let src = PixelBuffer::filled(2, 2, [0; 4]);
        let err = Engine::new().process(&src, &config).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidConfiguration(ConfigError::ZeroDimensions {
                width: 64,
                height: 0
            })
        );
    }

    #[test]
    fn test_empty_custom_palette() {
        let config = Configuration {
            palette: custom("zz, #12345"),
            ..Configuration::default()
        };
        let src = PixelBuffer::filled(2, 2, [9, 9, 9, 255]);
        let err = Engine::new().process(&src, &config).unwrap_err();
        assert_eq!(err, EngineError::EmptyPalette(EmptyPaletteCause::NoColors));
    }

    #[test]
    fn test_clustering_transparent_image() {
        let config = Configuration {
            target_width: 2,
            target_height: 2,
            palette: PaletteSource::Clustered { colors: 4 },
            ..Configuration::default()
        };
        let src = PixelBuffer::filled(2, 2, [9, 9, 9, 0]);
        let err = Engine::new().process(&src, &config).unwrap_err();
        assert_eq!(
            err,
            EngineError::EmptyPalette(EmptyPaletteCause::NothingToCluster)
        );
    }

    #[test]
    fn test_clustered_palette_reported() {
        let src = PixelBuffer::from_fn(4, 4, |x, _| {
            if x < 2 {
                [200, 0, 0, 255]
            } else {
                [0, 0, 200, 255]
            }
        });
        let config = Configuration {
            target_width: 4,
            target_height: 4,
            palette: PaletteSource::Clustered { colors: 2 },
            ..Configuration::default()
        };
        let out = Engine::new().process(&src, &config).unwrap();
        let generated = out.generated_palette.unwrap();
        assert_eq!(generated.len(), 2);
        assert!(generated.contains(&Color::new(200, 0, 0)));
        assert_eq!(out.buffer, src);
    }

    #[test]
    fn test_trivial_filter_uses_prior_stats() {
        let src = PixelBuffer::filled(4, 4, [250, 10, 10, 255]);
        let black = PixelBuffer::filled(1, 1, [0, 0, 0, 255]);
        let prior = ColorUsageStats::from_buffer(&black);
        let config = Configuration {
            target_width: 4,
            target_height: 4,
            palette: PaletteSource::Fixed(PaletteSpec {
                mode: PaletteMode::Merge,
                presets: vec![PresetPalette::BlackWhite],
                custom: "#FF0000".into(),
            }),
            filter_trivial_colors: true,
            prior_stats: prior,
            ..Configuration::default()
        };
        let out = Engine::new().process(&src, &config).unwrap();
        // Red and white were unused last time, so only black remains
        assert!(out.buffer.pixels().all(|p| p == [0, 0, 0, 255]));
    }

    #[test]
    fn test_suggest_delegates() {
        let src = PixelBuffer::filled(2, 2, [0, 200, 0, 255]);
        let out = Engine::new().suggest(&src, &[Color::BLACK], ColorMetric::Oklab, 3, false);
        assert_eq!(out, vec![Color::new(0, 200, 0)]);
    }
}
