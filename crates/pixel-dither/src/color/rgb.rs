//! 8-bit sRGB color triple
//!
//! [`Color`] is the exact, hashable color value used at every boundary of the
//! engine: palette entries, output pixels, statistics keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::palette::ParseColorError;

/// An 8-bit sRGB color.
///
/// Equality is exact value equality. Ordering follows the packed
/// `0xRRGGBB` value, so colors can key ordered maps deterministically.
/// Serializes as a `"#RRGGBB"` string.
///
/// # Example
///
/// ```
/// use pixel_dither::Color;
///
/// let red: Color = "#FF0000".parse().unwrap();
/// assert_eq!(red, Color::new(255, 0, 0));
/// assert_eq!(red.to_string(), "#FF0000");
/// assert_eq!(red.packed(), 0xFF0000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a packed `0xRRGGBB` value. Bits above 24 are ignored.
    #[inline]
    pub const fn from_packed(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    #[inline]
    pub const fn packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Channels as floats in 0.0..=255.0.
    #[inline]
    pub fn to_f64(self) -> [f64; 3] {
        [self.r as f64, self.g as f64, self.b as f64]
    }

    /// Round and clamp float channels (0.0..=255.0) to a color.
    #[inline]
    pub fn from_f64(rgb: [f64; 3]) -> Self {
        Self::new(
            channel_to_u8(rgb[0]),
            channel_to_u8(rgb[1]),
            channel_to_u8(rgb[2]),
        )
    }

    /// Rec. 601 luma in 0.0..=255.0.
    #[inline]
    pub fn luma(self) -> f64 {
        0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64
    }
}

#[inline]
pub(crate) fn channel_to_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB`. Case-insensitive,
    /// surrounding whitespace is trimmed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                // Shorthand: 0xF -> 0xFF
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!("#FFFFFF".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("00ff00".parse::<Color>().unwrap(), Color::new(0, 255, 0));
        assert_eq!("#F00".parse::<Color>().unwrap(), Color::new(255, 0, 0));
        let padded: Color = "  #0a0b0c ".parse().unwrap();
        assert_eq!(padded, Color::new(10, 11, 12));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "#12345".parse::<Color>(),
            Err(ParseColorError::InvalidLength)
        );
        assert!(matches!(
            "#GGGGGG".parse::<Color>(),
            Err(ParseColorError::InvalidHex(_))
        ));
        assert!("#ééé".parse::<Color>().is_err());
    }

    #[test]
    fn test_packed_round_trip() {
        let c = Color::new(0x12, 0x34, 0x56);
        assert_eq!(c.packed(), 0x123456);
        assert_eq!(Color::from_packed(0x123456), c);
        assert_eq!(Color::from_packed(0xFF123456), c);
    }

    #[test]
    fn test_ordering_follows_packed_value() {
        let mut colors = [
            Color::new(0, 0, 255),
            Color::new(1, 0, 0),
            Color::new(0, 255, 0),
        ];
        colors.sort();
        let packed: Vec<u32> = colors.iter().map(|c| c.packed()).collect();
        assert_eq!(packed, vec![0x0000FF, 0x00FF00, 0x010000]);
    }

    #[test]
    fn test_from_f64_rounds_and_clamps() {
        assert_eq!(
            Color::from_f64([-12.0, 127.5, 300.0]),
            Color::new(0, 128, 255)
        );
        assert_eq!(
            Color::from_f64([f64::NAN, 0.4, 254.6]),
            Color::new(0, 0, 255)
        );
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Color::new(255, 0, 16)).unwrap();
        assert_eq!(json, "\"#FF0010\"");
        let back: Color = serde_json::from_str("\"#ff0010\"").unwrap();
        assert_eq!(back, Color::new(255, 0, 16));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
