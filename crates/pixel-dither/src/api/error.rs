//! Error types of the engine's public API.
//!
//! [`EngineError`] is the single error [`Engine::process`](super::Engine::process)
//! returns. Stage-level errors convert into it with `?`.

use thiserror::Error;

use crate::palette::PaletteError;
use crate::quantize::QuantizeError;

/// A rejected [`Configuration`](super::Configuration) field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("target dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("{field} must be in 0..=100, got {value}")]
    StrengthOutOfRange { field: &'static str, value: u8 },

    #[error("{field} must be in -100..=100, got {value}")]
    AdjustmentOutOfRange { field: &'static str, value: i32 },

    #[error("preserve_detail_threshold must be finite and >= 0, got {0}")]
    InvalidThreshold(f64),

    #[error("a clustered palette needs at least one color")]
    ZeroClusters,
}

/// Why the engine ended up with nothing to match against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmptyPaletteCause {
    #[error("the palette specification yields no colors")]
    NoColors,

    #[error("the image has no opaque pixels to cluster")]
    NothingToCluster,

    #[error(transparent)]
    AllFiltered(#[from] QuantizeError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("empty palette: {0}")]
    EmptyPalette(EmptyPaletteCause),

    #[error("palette error: {0}")]
    Palette(PaletteError),

    /// A stage failed unexpectedly; raised by hosts that isolate panics.
    #[error("processing failed: {0}")]
    ProcessingFailure(String),
}

impl From<PaletteError> for EngineError {
    fn from(err: PaletteError) -> Self {
        match err {
            PaletteError::EmptyPalette => EngineError::EmptyPalette(EmptyPaletteCause::NoColors),
            other => EngineError::Palette(other),
        }
    }
}

impl From<QuantizeError> for EngineError {
    fn from(err: QuantizeError) -> Self {
        EngineError::EmptyPalette(EmptyPaletteCause::AllFiltered(err))
    }
}

/// An unrecognized option name, e.g. `"atkinson"` for a dither method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} {value:?}")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
}

impl ParseOptionError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_palette_errors_map_to_empty_palette() {
        let err = EngineError::from(PaletteError::EmptyPalette);
        assert_eq!(err, EngineError::EmptyPalette(EmptyPaletteCause::NoColors));

        let err = EngineError::from(QuantizeError::EmptyCandidateSet { palette_len: 3 });
        assert!(matches!(
            err,
            EngineError::EmptyPalette(EmptyPaletteCause::AllFiltered(_))
        ));
    }

    #[test]
    fn test_messages() {
        let err = EngineError::from(ConfigError::ZeroDimensions {
            width: 0,
            height: 8,
        });
        assert_eq!(
            err.to_string(),
            "invalid configuration: target dimensions must be non-zero, got 0x8"
        );
        assert_eq!(
            ParseOptionError::new("dither method", "atkinson").to_string(),
            "unknown dither method \"atkinson\""
        );
    }
}
