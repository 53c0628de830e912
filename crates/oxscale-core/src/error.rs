//! Error types for oxscale

use thiserror::Error;

/// Result type for oxscale operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in oxscale operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Interpolator parameters out of range
    #[error("Invalid interpolator: {0}")]
    InvalidInterpolator(String),

    /// Blur factor outside [0.5, 1.5]
    #[error("Blur factor {0} out of range [0.5, 1.5]")]
    BlurOutOfRange(f64),

    /// Legacy color metadata cannot describe a profile
    #[error("Invalid color metadata: {0}")]
    InvalidMetadata(String),

    /// No interpolation preset with this name
    #[error("Unknown interpolation preset: {0}")]
    UnknownPreset(String),

    /// Malformed configuration document
    #[cfg(feature = "serde")]
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}
