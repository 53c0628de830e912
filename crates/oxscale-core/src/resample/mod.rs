//! Resampling kernels
//!
//! Weighting functions, named presets and the fixed-point kernel maps a
//! separable convolution walks for scaling, blurring and alpha.

pub mod gaussian;
pub mod interpolator;
pub mod kernel_map;

pub use gaussian::GaussianFactory;
pub use interpolator::{InterpolationKind, InterpolationSettings, Interpolator};
pub use kernel_map::KernelMap;
