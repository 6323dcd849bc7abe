//! Palettes: construction, parsing, presets and k-means extraction
//!
//! A [`Palette`] is an ordered list of unique [`Color`](crate::Color)s with
//! precomputed perceptual coordinates. Fixed palettes come from
//! [`build_palette`]; clustered palettes come from [`KMeansClusterer`].

mod builder;
mod error;
mod kmeans;
mod palette;
mod parse;
mod presets;

pub use builder::{build_palette, PaletteMode};
pub use error::{PaletteError, ParseColorError};
pub use kmeans::KMeansClusterer;
pub use palette::{dedup_colors, Palette};
pub use parse::parse_palette_spec;
pub use presets::PresetPalette;
