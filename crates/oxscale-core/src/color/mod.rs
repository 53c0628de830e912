//! Color management building blocks
//!
//! - Conversion matrices (RGB→XYZ, Bradford adaptation to D50)
//! - Transfer-curve lookup tables and the curves built from them
//! - Named colors

pub mod conversion;
pub mod curve;
pub mod lut;
pub mod named;

pub use conversion::{ICC_D50, chromatic_adaptation, rgb_to_xyz};
pub use curve::ProfileCurve;
pub use named::{Rgba8, parse_color};
