//! Image preparation before quantization.
//!
//! Three independent stages, applied by the engine in this order:
//!
//! 1. [`adjust`]: uniform brightness, contrast and saturation
//! 2. [`preprocess`]: optional edge-aware smoothing ([`PreprocessMethod`])
//! 3. [`resample`]: scaling to the target size ([`ResampleMethod`])
//!
//! Each stage takes a buffer by reference and returns a new one. Fully
//! transparent pixels keep their alpha of zero throughout.

mod adjust;
mod filter;
mod oklch;
mod resample;

pub use adjust::adjust;
pub use filter::{preprocess, radius_for_strength, PreprocessMethod, MAX_RADIUS};
pub use resample::{resample, ResampleMethod};
