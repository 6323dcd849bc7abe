//! Uniform brightness, contrast and saturation adjustment.

use super::oklch::Oklch;
use crate::buffer::PixelBuffer;
use crate::color::{Color, LinearRgb, Oklab};

const MIDPOINT: f64 = 127.5;

/// Adjust every opaque pixel. Each amount is a percentage in −100..=100;
/// out-of-range amounts are clamped.
///
/// - brightness adds `brightness * 2.55` to each sRGB channel
/// - contrast scales sRGB channels around 127.5 by `(100 + contrast) / 100`
/// - saturation scales OKLCh chroma by `(100 + saturation) / 100`
///
/// All three at zero return an exact copy.
pub fn adjust(src: &PixelBuffer, brightness: i32, contrast: i32, saturation: i32) -> PixelBuffer {
    let brightness = brightness.clamp(-100, 100);
    let contrast = contrast.clamp(-100, 100);
    let saturation = saturation.clamp(-100, 100);
    if brightness == 0 && contrast == 0 && saturation == 0 {
        return src.clone();
    }

    let offset = f64::from(brightness) * 2.55;
    let contrast_factor = f64::from(100 + contrast) / 100.0;
    let chroma_factor = f64::from(100 + saturation) / 100.0;

    let mut out = src.data().to_vec();
    for px in out.chunks_exact_mut(4) {
        if px[3] == 0 {
            continue;
        }
        let mut rgb = Color::new(px[0], px[1], px[2]).to_f64();
        for v in &mut rgb {
            *v = ((*v + offset - MIDPOINT) * contrast_factor + MIDPOINT).clamp(0.0, 255.0);
        }
        if saturation != 0 {
            rgb = scale_saturation(rgb, chroma_factor);
        }
        let c = Color::from_f64(rgb);
        px[0] = c.r;
        px[1] = c.g;
        px[2] = c.b;
    }
    src.with_data(out)
}

#[inline]
fn scale_saturation(rgb: [f64; 3], factor: f64) -> [f64; 3] {
    let lch = Oklch::from(Oklab::from(LinearRgb::from_srgb(rgb)));
    LinearRgb::from(Oklab::from(lch.scale_chroma(factor))).to_srgb()
}
