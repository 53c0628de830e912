//! ICC profile parsing and synthesis
//!
//! Only the parts needed to classify a profile and extract its tone curve and
//! colorant matrix are decoded. Anything with an `A2B0`/`B2A0` table is left
//! for a full color management module.

pub mod builtin;
pub mod error;
pub mod parser;
pub mod reader;
pub mod types;

pub use builtin::ProfileMetadata;
pub use error::IccError;
pub use parser::{MIN_PROFILE_LENGTH, decode_matrix, decode_trc, parse, try_parse};
pub use reader::IccReader;
pub use types::{ProfileColorSpace, TagSignature, TypeSignature};
