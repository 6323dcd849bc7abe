//! Gamma lookup table access functions
//!
//! The tables are generated at compile time by build.rs.

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Decode one 8-bit sRGB channel to linear light. Exact table lookup.
#[inline]
pub fn srgb8_to_linear(v: u8) -> f64 {
    SRGB8_TO_LINEAR[v as usize]
}

#[inline]
fn interpolate(table: &[f64; 4096], v: f64) -> f64 {
    // NaN falls through clamp unchanged; treat it as black
    let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    let scaled = v * 4095.0;
    let index = scaled as usize;
    if index >= 4095 {
        return table[4095];
    }
    let frac = scaled - index as f64;
    let a = table[index];
    let b = table[index + 1];
    a + (b - a) * frac
}

/// Convert an sRGB value (0.0..=1.0) to linear RGB using LUT with linear interpolation.
///
/// Inputs outside 0.0..=1.0 are clamped.
#[inline]
pub fn srgb_to_linear(srgb: f64) -> f64 {
    interpolate(&SRGB_TO_LINEAR, srgb)
}

/// Convert a linear RGB value (0.0..=1.0) to sRGB using LUT with linear interpolation.
///
/// Inputs outside 0.0..=1.0 are clamped.
#[inline]
pub fn linear_to_srgb(linear: f64) -> f64 {
    interpolate(&LINEAR_TO_SRGB, linear)
}
