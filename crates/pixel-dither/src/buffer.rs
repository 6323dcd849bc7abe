//! RGBA8 pixel buffer shared by every pipeline stage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("pixel data length {actual} does not match {width}x{height} RGBA ({expected} bytes)")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// A row-major RGBA8 raster.
///
/// `data.len() == width * height * 4` always holds. Stages take buffers by
/// reference and allocate their own output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBuffer")]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

#[derive(Deserialize)]
struct RawBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl TryFrom<RawBuffer> for PixelBuffer {
    type Error = BufferError;

    fn try_from(raw: RawBuffer) -> Result<Self, Self::Error> {
        PixelBuffer::new(raw.width, raw.height, raw.data)
    }
}

impl PixelBuffer {
    /// Wrap existing RGBA8 data.
    ///
    /// # Errors
    ///
    /// [`BufferError::LengthMismatch`] if `data` is not exactly
    /// `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BufferError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(BufferError::LengthMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * 4);
        for _ in 0..count {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Same dimensions, new data. Stage outputs always have the input's length.
    pub(crate) fn with_data(&self, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), self.data.len());
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// RGBA at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds"
        );
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Colors of the pixels with alpha > 0, row-major.
    pub fn opaque_colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.pixels()
            .filter(|p| p[3] > 0)
            .map(|p| Color::new(p[0], p[1], p[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_length_invariant() {
        assert!(PixelBuffer::new(2, 2, vec![0; 16]).is_ok());
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "pixel data length 15 does not match 2x2 RGBA (16 bytes)"
        );
    }

    #[test]
    fn test_from_fn_row_major() {
        let buf = PixelBuffer::from_fn(3, 2, |x, y| [x as u8, y as u8, 0, 255]);
        assert_eq!(buf.pixel(2, 0), [2, 0, 0, 255]);
        assert_eq!(buf.pixel(1, 1), [1, 1, 0, 255]);
        assert_eq!(buf.data().len(), 24);
    }

    #[test]
    fn test_opaque_colors_skip_transparent() {
        let buf = PixelBuffer::from_fn(2, 1, |x, _| {
            if x == 0 {
                [1, 2, 3, 0]
            } else {
                [4, 5, 6, 9]
            }
        });
        let colors: Vec<Color> = buf.opaque_colors().collect();
        assert_eq!(colors, [Color::new(4, 5, 6)]);
    }

    #[test]
    fn test_deserialize_validates_length() {
        let ok = r#"{"width":1,"height":1,"data":[1,2,3,4]}"#;
        let buf: PixelBuffer = serde_json::from_str(ok).unwrap();
        assert_eq!(buf.pixel(0, 0), [1, 2, 3, 4]);

        let bad = r#"{"width":2,"height":1,"data":[1,2,3,4]}"#;
        assert!(serde_json::from_str::<PixelBuffer>(bad).is_err());
    }
}
