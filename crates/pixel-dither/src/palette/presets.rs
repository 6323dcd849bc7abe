//! Named palettes with published color values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::ParseOptionError;
use crate::color::Color;

const fn c(packed: u32) -> Color {
    Color::from_packed(packed)
}

const BLACK_WHITE: [Color; 2] = [c(0x000000), c(0xFFFFFF)];

const GRAYSCALE4: [Color; 4] = [c(0x000000), c(0x555555), c(0xAAAAAA), c(0xFFFFFF)];

const GAME_BOY: [Color; 4] = [c(0x0F380F), c(0x306230), c(0x8BAC0F), c(0x9BBC0F)];

#[rustfmt::skip]
const CGA: [Color; 16] = [
    c(0x000000), c(0x0000AA), c(0x00AA00), c(0x00AAAA),
    c(0xAA0000), c(0xAA00AA), c(0xAA5500), c(0xAAAAAA),
    c(0x555555), c(0x5555FF), c(0x55FF55), c(0x55FFFF),
    c(0xFF5555), c(0xFF55FF), c(0xFFFF55), c(0xFFFFFF),
];

#[rustfmt::skip]
const PICO8: [Color; 16] = [
    c(0x000000), c(0x1D2B53), c(0x7E2553), c(0x008751),
    c(0xAB5236), c(0x5F574F), c(0xC2C3C7), c(0xFFF1E8),
    c(0xFF004D), c(0xFFA300), c(0xFFEC27), c(0x00E436),
    c(0x29ADFF), c(0x83769C), c(0xFF77A8), c(0xFFCCAA),
];

#[rustfmt::skip]
const SWEETIE16: [Color; 16] = [
    c(0x1A1C2C), c(0x5D275D), c(0xB13E53), c(0xEF7D57),
    c(0xFFCD75), c(0xA7F070), c(0x38B764), c(0x257179),
    c(0x29366F), c(0x3B5DC9), c(0x41A6F6), c(0x73EFF7),
    c(0xF4F4F4), c(0x94B0C2), c(0x566C86), c(0x333C57),
];

/// A built-in palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetPalette {
    BlackWhite,
    Grayscale4,
    GameBoy,
    Cga,
    Pico8,
    Sweetie16,
}

impl PresetPalette {
    pub const ALL: [PresetPalette; 6] = [
        PresetPalette::BlackWhite,
        PresetPalette::Grayscale4,
        PresetPalette::GameBoy,
        PresetPalette::Cga,
        PresetPalette::Pico8,
        PresetPalette::Sweetie16,
    ];

    /// Entries in their published order.
    pub fn colors(self) -> &'static [Color] {
        match self {
            PresetPalette::BlackWhite => &BLACK_WHITE,
            PresetPalette::Grayscale4 => &GRAYSCALE4,
            PresetPalette::GameBoy => &GAME_BOY,
            PresetPalette::Cga => &CGA,
            PresetPalette::Pico8 => &PICO8,
            PresetPalette::Sweetie16 => &SWEETIE16,
        }
    }

    /// Snake_case name used in settings files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            PresetPalette::BlackWhite => "black_white",
            PresetPalette::Grayscale4 => "grayscale4",
            PresetPalette::GameBoy => "game_boy",
            PresetPalette::Cga => "cga",
            PresetPalette::Pico8 => "pico8",
            PresetPalette::Sweetie16 => "sweetie16",
        }
    }
}

impl fmt::Display for PresetPalette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PresetPalette {
    type Err = ParseOptionError;

    /// Accepts the snake_case name; `-` is treated as `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase().replace('-', "_");
        PresetPalette::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ParseOptionError::new("preset palette", &s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_presets_are_unique_and_nonempty() {
        for preset in PresetPalette::ALL {
            let colors = preset.colors();
            assert!(!colors.is_empty());
            let unique: HashSet<_> = colors.iter().collect();
            assert_eq!(unique.len(), colors.len(), "{preset} has duplicates");
        }
    }

    #[test]
    fn test_serde_names_match_display() {
        for preset in PresetPalette::ALL {
            let json = serde_json::to_string(&preset).unwrap();
            assert_eq!(json, format!("\"{preset}\""));
            assert_eq!(preset.name().parse::<PresetPalette>().unwrap(), preset);
        }
        let parsed: PresetPalette = "Game-Boy".parse().unwrap();
        assert_eq!(parsed, PresetPalette::GameBoy);
    }

    #[test]
    fn test_game_boy_values() {
        let colors = PresetPalette::GameBoy.colors();
        assert_eq!(colors[0], Color::new(0x0F, 0x38, 0x0F));
        assert_eq!(colors[3], Color::new(0x9B, 0xBC, 0x0F));
    }
}
