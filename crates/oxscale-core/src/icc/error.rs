//! ICC profile rejection reasons

use std::fmt;

use super::types::{TagSignature, fourcc};

/// Why a profile (or one of its tags) could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IccError {
    /// Profile data is smaller than the smallest parseable profile
    TooSmall { expected: usize, actual: usize },
    /// Profile size in header doesn't match data
    SizeMismatch { header_size: u32, actual_size: usize },
    /// Invalid profile signature (should be 'acsp')
    InvalidSignature(u32),
    /// Major version is neither 2 nor 4
    UnsupportedVersion(u8),
    /// Tag count doesn't fit in the profile
    TagTableOverflow { count: u32, profile_size: usize },
    /// Tag offset is out of bounds
    TagOutOfBounds {
        tag: TagSignature,
        offset: u32,
        size: u32,
        profile_size: usize,
    },
    /// Tag is smaller than a type header
    TagTooSmall { tag: TagSignature, size: u32 },
    /// Required tag is missing
    MissingTag(TagSignature),
    /// Tag data has an unexpected type signature
    InvalidTagType { tag: TagSignature, type_sig: u32 },
    /// Curve data is truncated, non-monotonic or numerically unusable
    InvalidCurve(TagSignature),
    /// Per-channel curves differ
    ChannelCurvesDiffer,
    /// Colorant tags don't share a type header
    ColorantHeaderMismatch,
    /// Colorant matrix has no inverse
    SingularMatrix,
    /// Read past the end of a buffer
    OutOfRange { offset: usize, len: usize },
}

impl fmt::Display for IccError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooSmall { expected, actual } => {
                write!(f, "Profile too small: expected at least {expected} bytes, got {actual}")
            }
            Self::SizeMismatch {
                header_size,
                actual_size,
            } => {
                write!(
                    f,
                    "Size mismatch: header says {header_size} bytes, data is {actual_size} bytes"
                )
            }
            Self::InvalidSignature(sig) => {
                write!(f, "Invalid profile signature: 0x{sig:08X} (expected 'acsp')")
            }
            Self::UnsupportedVersion(major) => {
                write!(f, "Unsupported profile version: {major}")
            }
            Self::TagTableOverflow {
                count,
                profile_size,
            } => {
                write!(f, "Tag table of {count} entries exceeds profile size {profile_size}")
            }
            Self::TagOutOfBounds {
                tag,
                offset,
                size,
                profile_size,
            } => {
                write!(
                    f,
                    "Tag '{tag}' out of bounds: offset {offset} + size {size} > profile size {profile_size}"
                )
            }
            Self::TagTooSmall { tag, size } => {
                write!(f, "Tag '{tag}' too small: {size} bytes")
            }
            Self::MissingTag(tag) => write!(f, "Required tag missing: '{tag}'"),
            Self::InvalidTagType { tag, type_sig } => {
                write!(f, "Invalid type '{}' for tag '{tag}'", fourcc(*type_sig))
            }
            Self::InvalidCurve(tag) => write!(f, "Invalid curve in tag '{tag}'"),
            Self::ChannelCurvesDiffer => write!(f, "Per-channel curves are not identical"),
            Self::ColorantHeaderMismatch => write!(f, "Colorant tag headers differ"),
            Self::SingularMatrix => write!(f, "Colorant matrix is not invertible"),
            Self::OutOfRange { offset, len } => {
                write!(f, "Read at offset {offset} past end of {len}-byte buffer")
            }
        }
    }
}

impl std::error::Error for IccError {}
