//! # oxscale - color and kernel core for high-quality image scaling
//!
//! Two numerical subsystems an image resizing pipeline is built on:
//!
//! - **Color**: an ICC profile parser that classifies profiles and extracts
//!   the tone curve and colorant matrix of the common grey and RGB cases,
//!   a content-addressed profile cache, and canonical sRGB, sGrey,
//!   Adobe RGB, Display P3 and CMYK profiles.
//! - **Resampling**: fixed-point kernel maps for scaling, Gaussian blur and
//!   premultiplied alpha, with edge weight folded onto in-range samples.
//!
//! Profiles that need A2B0/B2A0 table evaluation are classified
//! [`ColorProfileType::Table`] and left to a full CMS.
//!
//! ## Quick Start
//!
//! ```no_run
//! use oxscale_core::{ColorProfile, ColorProfileMode, InterpolationKind, KernelMap, cache};
//!
//! # let embedded: Vec<u8> = Vec::new();
//! let profile = cache::get_or_add(&embedded);
//! let source = ColorProfile::source_profile(&profile, ColorProfileMode::Normalize);
//! let dest = ColorProfile::dest_profile(&source, ColorProfileMode::Normalize);
//!
//! let map = KernelMap::make_scale_map(4000, 1000, &InterpolationKind::Lanczos.settings());
//! for (start, weights) in map.windows() {
//!     // convolve input[start..start + weights.len()]
//! }
//! ```

pub mod cache;
pub mod color;
pub mod config;
pub mod error;
pub mod icc;
pub mod math;
pub mod pixel;
pub mod profile;
pub mod resample;

pub use cache::ProfileCache;
pub use color::{ProfileCurve, Rgba8, parse_color};
pub use config::{ColorProfileMode, ProcessingOptions};
pub use error::{Error, Result};
pub use icc::{IccError, ProfileColorSpace, ProfileMetadata};
pub use math::{Matrix3x3, Vector3};
pub use pixel::{PixelColorRepresentation, PixelFormat};
pub use profile::{ColorProfile, ColorProfileType, CurveProfile, MatrixProfile};
pub use resample::{InterpolationKind, InterpolationSettings, Interpolator, KernelMap};

/// Version of oxscale
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
