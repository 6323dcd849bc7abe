//! Color types, conversions and distance metrics
//!
//! - [`Color`]: exact 8-bit sRGB triple, used for I/O and palettes
//! - [`LinearRgb`]: linear light, intermediate for the perceptual spaces
//! - [`Lab`]: CIE 1976 L\*a\*b\*, D65
//! - [`Oklab`]: Björn Ottosson's perceptual space
//! - [`ColorMetric`]: CIE76, CIE94, CIEDE2000 and OKLab distances
//!
//! # Example
//!
//! ```
//! use pixel_dither::{Color, ColorMetric, Lab, Oklab};
//!
//! let orange = Color::new(255, 128, 0);
//! let lab = Lab::from(orange);
//! let oklab = Oklab::from(orange);
//! assert!(lab.l > 50.0 && oklab.l > 0.5);
//!
//! let d = ColorMetric::Cie76.distance(orange, Color::new(255, 140, 0));
//! assert!(d > 0.0 && d < 10.0);
//! ```

mod lab;
mod linear_rgb;
mod lut;
mod metric;
mod oklab;
mod rgb;

pub use lab::Lab;
pub use linear_rgb::LinearRgb;
pub use metric::ColorMetric;
pub use oklab::Oklab;
pub use rgb::Color;

pub(crate) use rgb::channel_to_u8;
