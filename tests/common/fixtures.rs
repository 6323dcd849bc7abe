//! Test fixtures and constants.

use pixel_dither::{Configuration, PaletteMode, PaletteSource, PaletteSpec, PixelBuffer};

/// Two-color palettes in the custom spec format
pub mod palettes {
    pub const MONO: &str = "#000000, #FFFFFF";
    pub const BLUE: &str = "#0000FF";
    pub const RGB: &str = "#FF0000 #00FF00 #0000FF";
}

/// Settings file with one profile per palette source
pub const SETTINGS_YAML: &str = r##"
defaults:
  target_width: 16
  target_height: 16
  palette:
    kind: fixed
    mode: custom
    presets: []
    custom: "#000000, #FFFFFF"
profiles:
  tiny:
    target_width: 4
    target_height: 4
    dither: bayer4
  extract:
    palette: { kind: clustered, colors: 3 }
"##;

/// Black/white checkerboard of 1px cells
pub fn checkerboard(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            [0, 0, 0, 255]
        } else {
            [255, 255, 255, 255]
        }
    })
}

/// Smooth RGB gradient, fully opaque
pub fn gradient(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(2).saturating_sub(1)).min(255) as u8;
        let g = (y * 255 / height.max(2).saturating_sub(1)).min(255) as u8;
        [r, g, 128, 255]
    })
}

/// Configuration matching a custom palette spec at the given size
pub fn custom_config(spec: &str, width: u32, height: u32) -> Configuration {
    Configuration {
        target_width: width,
        target_height: height,
        palette: PaletteSource::Fixed(PaletteSpec {
            mode: PaletteMode::Custom,
            presets: Vec::new(),
            custom: spec.to_string(),
        }),
        ..Configuration::default()
    }
}
