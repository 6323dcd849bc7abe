//! Pixelforge - palette quantization and dithering for pixel art
//!
//! Host side of the `pixel-dither` engine: a background worker with a typed
//! request channel, YAML settings, and the PNG codec.
//! This library exposes modules for integration testing.

pub mod codec;
pub mod error;
pub mod models;
pub mod services;
