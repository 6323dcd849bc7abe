//! Assertion helpers for tests.

use pixel_dither::{Color, ColorUsageStats, PixelBuffer};
use pixelforge::models::EngineResponse;
use pretty_assertions::assert_eq;

/// Unwrap a `Processed` response
pub fn expect_processed(
    response: EngineResponse,
) -> (PixelBuffer, Option<Vec<Color>>, ColorUsageStats) {
    match response {
        EngineResponse::Processed {
            result,
            generated_palette,
            color_stats,
        } => (result, generated_palette, color_stats),
        other => panic!("Expected Processed response, got {other:?}"),
    }
}

/// Unwrap an `Error` response's message
pub fn expect_error(response: EngineResponse) -> String {
    match response {
        EngineResponse::Error { message } => message,
        other => panic!("Expected Error response, got {other:?}"),
    }
}

/// Assert every opaque pixel is one of `palette`
pub fn assert_palette_only(buffer: &PixelBuffer, palette: &[Color]) {
    for (i, p) in buffer.pixels().enumerate() {
        if p[3] == 0 {
            continue;
        }
        let color = Color::new(p[0], p[1], p[2]);
        assert!(
            palette.contains(&color),
            "Pixel {} is {}, not in palette {:?}",
            i,
            color,
            palette
        );
    }
}

/// Assert buffer dimensions
pub fn assert_size(buffer: &PixelBuffer, width: u32, height: u32) {
    assert_eq!(
        (buffer.width(), buffer.height()),
        (width, height),
        "Unexpected buffer size"
    );
}

/// Assert bytes carry the PNG signature
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}
