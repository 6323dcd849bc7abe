//! Working-palette assembly from presets and custom specs.

use serde::{Deserialize, Serialize};

use super::error::PaletteError;
use super::palette::Palette;
use super::parse::parse_palette_spec;
use super::presets::PresetPalette;

/// Which sources contribute to a fixed palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteMode {
    /// Only the selected presets.
    #[default]
    Preset,
    /// Only the custom spec.
    Custom,
    /// Presets first, then custom colors.
    Merge,
}

/// Build an ordered, duplicate-free palette.
///
/// Colors keep their source order (presets in selection order, then custom
/// colors in `Merge` mode); repeats keep their first position.
///
/// # Errors
///
/// [`PaletteError::EmptyPalette`] if the selected sources yield no colors.
///
/// # Example
///
/// ```
/// use pixel_dither::{build_palette, Color, PaletteMode, PresetPalette};
///
/// let palette = build_palette(
///     PaletteMode::Merge,
///     &[PresetPalette::BlackWhite],
///     "#FF0000, #000000",
/// )
/// .unwrap();
/// assert_eq!(palette.colors(), &[Color::BLACK, Color::WHITE, Color::new(255, 0, 0)]);
/// ```
pub fn build_palette(
    mode: PaletteMode,
    presets: &[PresetPalette],
    custom_spec: &str,
) -> Result<Palette, PaletteError> {
    let preset_colors = || presets.iter().flat_map(|p| p.colors().iter().copied());

    let palette = match mode {
        PaletteMode::Preset => Palette::deduplicated(preset_colors()),
        PaletteMode::Custom => Palette::deduplicated(parse_palette_spec(custom_spec)),
        PaletteMode::Merge => {
            Palette::deduplicated(preset_colors().chain(parse_palette_spec(custom_spec)))
        }
    }?;

    tracing::debug!(?mode, colors = palette.len(), "Built palette");
    Ok(palette)
}
