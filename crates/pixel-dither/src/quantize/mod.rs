//! Palette quantization and color-usage statistics

mod candidates;
mod quantizer;
mod stats;

use thiserror::Error;

pub use candidates::{CandidateSet, TRIVIAL_COLOR_PERCENT};
pub use quantizer::Quantizer;
pub use stats::{ColorUsage, ColorUsageStats};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantizeError {
    #[error("no palette colors left to match against ({palette_len} in palette, all filtered)")]
    EmptyCandidateSet { palette_len: usize },
}
