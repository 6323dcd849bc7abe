//! Public API: [`Configuration`], [`Engine`] and the unified [`EngineError`].

mod config;
mod engine;
mod error;

pub use config::{Configuration, PaletteSource, PaletteSpec};
pub use engine::{Engine, EngineOutput};
pub use error::{ConfigError, EmptyPaletteCause, EngineError, ParseOptionError};
