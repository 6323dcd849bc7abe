//! Error types for color parsing and palette validation

use std::num::ParseIntError;

use thiserror::Error;

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    #[error("invalid hex color length (expected 3 or 6 characters)")]
    InvalidLength,
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}

/// Error returned when a palette cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("palette cannot be empty")]
    EmptyPalette,
    #[error("duplicate color {color} found at index {index}")]
    DuplicateColor {
        color: crate::Color,
        index: usize,
    },
    #[error("invalid color: {0}")]
    ParseColor(#[from] ParseColorError),
}
