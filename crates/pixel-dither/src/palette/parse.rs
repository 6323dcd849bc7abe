//! Best-effort parsing of free-form palette text.

use super::palette::dedup_colors;
use crate::color::Color;

/// Parse a palette specification into an ordered, duplicate-free color list.
///
/// Tokens are separated by whitespace, commas or semicolons. Each token is
/// read as:
///
/// - `#RRGGBB`, `0xRRGGBB`: hex with an explicit marker (exactly 6 digits)
/// - `RRGGBB`: six hex digits without a marker
/// - any other run of decimal digits: a packed `0xRRGGBB` value in
///   `0..=16777215`
///
/// Anything else is skipped. Duplicates keep their first position.
///
/// # Example
///
/// ```
/// use pixel_dither::{parse_palette_spec, Color};
///
/// let colors = parse_palette_spec("#FFFFFF, 0, FF0000, zz, #12345");
/// assert_eq!(colors, vec![Color::WHITE, Color::BLACK, Color::new(255, 0, 0)]);
/// ```
pub fn parse_palette_spec(spec: &str) -> Vec<Color> {
    let tokens = spec
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|t| !t.is_empty());

    let mut parsed = Vec::new();
    for token in tokens {
        match parse_token(token) {
            Some(color) => parsed.push(color),
            None => tracing::debug!(token, "Skipping unrecognized palette token"),
        }
    }
    dedup_colors(parsed)
}

fn parse_token(token: &str) -> Option<Color> {
    let marked = token
        .strip_prefix('#')
        .or_else(|| token.strip_prefix("0x"))
        .or_else(|| token.strip_prefix("0X"));

    if let Some(hex) = marked {
        return parse_hex6(hex);
    }
    if token.len() == 6 && token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return parse_hex6(token);
    }
    if token.bytes().all(|b| b.is_ascii_digit()) {
        let value: u32 = token.parse().ok()?;
        if value <= 0xFF_FFFF {
            return Some(Color::from_packed(value));
        }
    }
    None
}

fn parse_hex6(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().map(Color::from_packed)
}
