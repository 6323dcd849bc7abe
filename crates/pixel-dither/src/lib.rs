// Generated LUT tables and per-channel index loops
#![allow(clippy::excessive_precision, clippy::needless_range_loop, clippy::module_inception)]

//! pixel-dither: palette quantization and dithering for pixel art
//!
//! The crate turns an arbitrary RGBA image into a palette-constrained,
//! pixel-art-style image. It is pure CPU code over in-memory buffers with no
//! I/O.
//!
//! # Quick Start
//!
//! [`Engine::process`] runs the full pipeline from a [`Configuration`]:
//!
//! ```
//! use pixel_dither::{
//!     Configuration, DitherMethod, Engine, PaletteSource, PaletteSpec, PixelBuffer, PresetPalette,
//! };
//!
//! let config = Configuration {
//!     target_width: 8,
//!     target_height: 8,
//!     dither: DitherMethod::Bayer4,
//!     palette: PaletteSource::Fixed(PaletteSpec {
//!         presets: vec![PresetPalette::GameBoy],
//!         ..PaletteSpec::default()
//!     }),
//!     ..Configuration::default()
//! };
//! let source = PixelBuffer::from_fn(32, 32, |x, y| [(x * 8) as u8, (y * 8) as u8, 96, 255]);
//! let output = Engine::new().process(&source, &config).unwrap();
//!
//! assert_eq!((output.buffer.width(), output.buffer.height()), (8, 8));
//! assert!(output.stats.len() <= 4);
//! ```
//!
//! # Pipeline
//!
//! 1. [`adjust`]: brightness, contrast, saturation
//! 2. [`preprocess`]: bilateral, Kuwahara or median smoothing
//! 3. [`resample`]: nearest, bilinear or Lanczos scaling
//! 4. Palette: [`build_palette`] from presets/custom colors, or
//!    [`KMeansClusterer`] extraction
//! 5. [`Quantizer`] + [`Ditherer`]: nearest-entry matching under a
//!    [`ColorMetric`], perturbed by error diffusion or a threshold map
//!
//! Each stage reads a [`PixelBuffer`] and returns a new one. Fully
//! transparent pixels are never matched, dithered or used as filter input.
//!
//! # Color Science
//!
//! Palette matching happens in a perceptual space chosen by [`ColorMetric`]:
//! CIELAB (D65) for CIE76, CIE94 and CIEDE2000, or OKLab. Error diffusion
//! accumulates residuals in sRGB units, so a residual of 10 means ten code
//! values on the channel regardless of metric. Ordered dithering spreads its
//! threshold over `256 / cbrt(palette_len)` sRGB units, roughly the spacing of
//! a uniform palette of that size.
//!
//! sRGB decoding goes through build-time generated lookup tables
//! (`build.rs`): an exact 256-entry table for 8-bit input and 4096-entry
//! interpolated tables for float channels.

pub mod api;
pub mod buffer;
pub mod color;
pub mod dither;
pub mod palette;
pub mod preprocess;
pub mod quantize;
pub mod suggest;

#[cfg(test)]
mod domain_tests;

pub use api::{
    ConfigError, Configuration, EmptyPaletteCause, Engine, EngineError, EngineOutput,
    PaletteSource, PaletteSpec, ParseOptionError,
};
pub use buffer::{BufferError, PixelBuffer};
pub use color::{Color, ColorMetric, Lab, LinearRgb, Oklab};
pub use dither::{DitherMethod, Ditherer};
pub use palette::{
    build_palette, parse_palette_spec, KMeansClusterer, Palette, PaletteError, PaletteMode,
    ParseColorError, PresetPalette,
};
pub use preprocess::{adjust, preprocess, resample, PreprocessMethod, ResampleMethod};
pub use quantize::{CandidateSet, ColorUsage, ColorUsageStats, QuantizeError, Quantizer};
pub use suggest::ColorSuggester;
