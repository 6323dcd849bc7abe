//! Domain-critical regression tests for pixel-dither.
//!
//! Each test guards a property the whole pipeline must keep, not a single
//! stage's happy path.

#[cfg(test)]
mod domain_tests {
    use crate::api::{Configuration, Engine, PaletteSource, PaletteSpec};
    use crate::buffer::PixelBuffer;
    use crate::color::{Color, ColorMetric};
    use crate::dither::DitherMethod;
    use crate::palette::{parse_palette_spec, KMeansClusterer, PaletteMode, PresetPalette};
    use crate::preprocess::{PreprocessMethod, ResampleMethod};
    use crate::quantize::ColorUsageStats;
    use pretty_assertions::assert_eq;

    fn custom(spec: &str) -> PaletteSource {
        PaletteSource::Fixed(PaletteSpec {
            mode: PaletteMode::Custom,
            presets: Vec::new(),
            custom: spec.into(),
        })
    }

    fn photo(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| {
            let r = (x * 255 / (width - 1)) as u8;
            let g = (y * 255 / (height - 1)) as u8;
            let b = ((x + y) * 7 % 256) as u8;
            [r, g, b, 255]
        })
    }

    // ========================================================================
    // Exact palette content must survive the pipeline untouched
    // ========================================================================

    /// If this breaks, plain quantization is perturbing pixels that already
    /// are palette colors (e.g. a resampler running at identity size, or a
    /// metric with a non-zero self distance).
    #[test]
    fn test_checkerboard_identity() {
        let src = PixelBuffer::from_fn(64, 64, |x, y| {
            if (x + y) % 2 == 0 {
                [0, 0, 0, 255]
            } else {
                [255, 255, 255, 255]
            }
        });
        let config = Configuration {
            target_width: 64,
            target_height: 64,
            palette: custom("#000000, #FFFFFF"),
            color_metric: ColorMetric::Cie76,
            dither: DitherMethod::None,
            ..Configuration::default()
        };
        let out = Engine::new().process(&src, &config).unwrap();
        assert_eq!(out.buffer, src);
        assert_eq!(out.stats.get(Color::BLACK).unwrap().pixel_count, 2048);
        assert_eq!(out.stats.percent(Color::WHITE), 50.0);
    }

    #[test]
    fn test_solid_red_to_blue_stats() {
        let config = Configuration {
            target_width: 4,
            target_height: 4,
            palette: custom("#0000FF"),
            ..Configuration::default()
        };
        let src = PixelBuffer::filled(4, 4, [255, 0, 0, 255]);
        let out = Engine::new().process(&src, &config).unwrap();
        assert!(out.buffer.pixels().all(|p| p == [0, 0, 255, 255]));
        let json = serde_json::to_value(&out.stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"#0000FF": {"pixel_count": 16, "percent": 100.0}})
        );
    }

    #[test]
    fn test_palette_spec_parsing() {
        assert_eq!(
            parse_palette_spec("#FFFFFF, 0, FF0000"),
            vec![Color::WHITE, Color::BLACK, Color::new(255, 0, 0)]
        );
        assert_eq!(parse_palette_spec("zz, #12345"), Vec::<Color>::new());
    }

    // ========================================================================
    // Output membership and transparency for every method and metric
    // ========================================================================

    /// If this breaks, some method emits an off-palette color (e.g. writing
    /// the perturbed working color instead of the chosen entry) or touches
    /// transparent pixels.
    #[test]
    fn test_every_method_emits_palette_colors_only() {
        let src = PixelBuffer::from_fn(24, 24, |x, y| {
            if x % 7 == 0 && y % 5 == 0 {
                [255, 255, 0, 0]
            } else {
                [(x * 10) as u8, (y * 10) as u8, 128, 255]
            }
        });
        let palette = PresetPalette::Pico8.colors();
        for metric in ColorMetric::ALL {
            for dither in DitherMethod::ALL {
                let config = Configuration {
                    target_width: 24,
                    target_height: 24,
                    dither,
                    dither_strength: 75,
                    serpentine: true,
                    color_metric: metric,
                    palette: PaletteSource::Fixed(PaletteSpec::default()),
                    ..Configuration::default()
                };
                let out = Engine::new().process(&src, &config).unwrap();
                for (a, b) in src.pixels().zip(out.buffer.pixels()) {
                    assert_eq!(a[3], b[3]);
                    if a[3] == 0 {
                        assert_eq!(b, a, "{metric}/{dither} touched a transparent pixel");
                    } else {
                        let c = Color::new(b[0], b[1], b[2]);
                        assert!(palette.contains(&c), "{metric}/{dither} emitted {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_trivial_filter_restricts_output() {
        let src = photo(16, 16);
        let first = Configuration {
            target_width: 16,
            target_height: 16,
            palette: PaletteSource::Fixed(PaletteSpec {
                presets: vec![PresetPalette::Sweetie16],
                ..PaletteSpec::default()
            }),
            ..Configuration::default()
        };
        let engine = Engine::new();
        let prior = engine.process(&src, &first).unwrap().stats;

        // Stats travel through the host as JSON
        let json = serde_json::to_string(&prior).unwrap();
        let prior: ColorUsageStats = serde_json::from_str(&json).unwrap();

        let second = Configuration {
            dither: DitherMethod::FloydSteinberg,
            filter_trivial_colors: true,
            prior_stats: prior.clone(),
            ..first
        };
        let out = engine.process(&src, &second).unwrap();
        for (color, _) in out.stats.iter() {
            assert!(
                prior.percent(color) >= 0.1,
                "{color} was trivial in the prior run"
            );
        }
    }

    // ========================================================================
    // Determinism
    // ========================================================================

    #[test]
    fn test_full_pipeline_deterministic() {
        let src = photo(40, 30);
        let config = Configuration {
            target_width: 20,
            target_height: 15,
            resampling: ResampleMethod::Lanczos,
            dither: DitherMethod::Stucki,
            palette: PaletteSource::Clustered { colors: 6 },
            preprocessing: PreprocessMethod::Bilateral,
            preprocessing_strength: 40,
            brightness: 10,
            contrast: 15,
            saturation: 20,
            preserve_detail_threshold: 3.0,
            color_metric: ColorMetric::Ciede2000,
            ..Configuration::default()
        };
        let a = Engine::new().process(&src, &config).unwrap();
        let b = Engine::new().process(&src, &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.generated_palette.as_ref().map(Vec::len), Some(6));
    }

    #[test]
    fn test_zero_strength_equals_no_dither() {
        let src = photo(12, 12);
        let base = Configuration {
            target_width: 12,
            target_height: 12,
            ..Configuration::default()
        };
        let plain = Engine::new().process(&src, &base).unwrap();
        for dither in DitherMethod::ALL {
            let config = Configuration {
                dither,
                dither_strength: 0,
                ..base.clone()
            };
            let out = Engine::new().process(&src, &config).unwrap();
            assert_eq!(out, plain, "{dither}");
        }
    }

    // ========================================================================
    // Metric and clustering invariants
    // ========================================================================

    #[test]
    fn test_metrics_zero_and_symmetric() {
        let steps = [0u8, 37, 128, 200, 255];
        let mut colors = Vec::new();
        for &r in &steps {
            for &g in &steps {
                for &b in &steps {
                    colors.push(Color::new(r, g, b));
                }
            }
        }
        for metric in ColorMetric::ALL {
            for &c1 in &colors {
                assert_eq!(metric.distance(c1, c1), 0.0, "{metric} {c1}");
                for &c2 in colors.iter().step_by(7) {
                    let d12 = metric.distance(c1, c2);
                    let d21 = metric.distance(c2, c1);
                    assert!(d12.is_finite() && d12 >= 0.0);
                    assert!((d12 - d21).abs() < 1e-9, "{metric}: {c1} {c2} {d12} {d21}");
                }
            }
        }
    }

    /// If this breaks, k-means returns duplicates after rounding, too few
    /// colors, or centroids outside the image gamut.
    #[test]
    fn test_kmeans_exact_count_within_bounds() {
        let src = PixelBuffer::from_fn(20, 20, |x, y| {
            let r = 40 + (x * 7) as u8;
            let g = 90 + (y * 3) as u8;
            [r, g, 60, 255]
        });
        for k in [1, 2, 5, 16, 33] {
            let colors = KMeansClusterer::new().cluster(&src, k);
            assert_eq!(colors.len(), k);
            let mut unique = colors.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), k);
            for c in colors {
                let in_bounds = (40..=173).contains(&c.r) && (90..=147).contains(&c.g);
                assert!(in_bounds && c.b == 60, "{c}");
            }
        }
    }
}
