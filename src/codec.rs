//! PNG in and out of [`PixelBuffer`].
//!
//! Decoding accepts any PNG layout the `png` crate reads and widens it to
//! RGBA8. Encoding always writes RGBA8.

use std::io::Cursor;
use std::path::Path;

use pixel_dither::PixelBuffer;

use crate::error::CodecError;

/// Decode PNG bytes into an RGBA8 buffer.
///
/// Palette, low bit depth and `tRNS` images are expanded and 16-bit samples
/// are stripped to 8 bits before gray and RGB rows are widened to RGBA.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, CodecError> {
    let mut decoder = png::Decoder::new(bytes);
    let transformations = png::Transformations::EXPAND | png::Transformations::STRIP_16;
    decoder.set_transformations(transformations);
    let mut reader = decoder.read_info()?;
    let mut raw = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut raw)?;
    raw.truncate(info.buffer_size());

    let rgba = match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgba, png::BitDepth::Eight) => raw,
        (png::ColorType::Rgb, png::BitDepth::Eight) => raw
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => raw
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            raw.iter().flat_map(|&g| [g, g, g, 255]).collect()
        }
        (color, depth) => return Err(CodecError::Unsupported(color, depth)),
    };

    tracing::debug!(
        width = info.width,
        height = info.height,
        color = ?info.color_type,
        "Decoded PNG"
    );
    Ok(PixelBuffer::new(info.width, info.height, rgba)?)
}

/// Encode a buffer as an RGBA8 PNG.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, CodecError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, buffer.width(), buffer.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(buffer.data())?;
        writer.finish()?;
    }
    Ok(buf.into_inner())
}

pub fn read_png(path: &Path) -> Result<PixelBuffer, CodecError> {
    decode_png(&std::fs::read(path)?)
}

pub fn write_png(path: &Path, buffer: &PixelBuffer) -> Result<(), CodecError> {
    std::fs::write(path, encode_png(buffer)?)?;
    Ok(())
}
