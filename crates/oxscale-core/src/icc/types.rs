//! ICC signatures and tag table records

use std::fmt;
use std::ops::Range;

/// Render a 4-byte signature as text
pub fn fourcc(sig: u32) -> String {
    sig.to_be_bytes()
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
        .collect()
}

/// `acsp`, at header offset 36
pub const PROFILE_SIGNATURE: u32 = u32::from_be_bytes(*b"acsp");

/// ICC Tag Signature (4-byte ASCII code)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagSignature(pub u32);

impl TagSignature {
    /// Create from 4 ASCII characters
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    pub const A2B0: Self = Self::from_bytes(*b"A2B0");
    pub const B2A0: Self = Self::from_bytes(*b"B2A0");
    pub const BLUE_COLORANT: Self = Self::from_bytes(*b"bXYZ");
    pub const BLUE_TRC: Self = Self::from_bytes(*b"bTRC");
    pub const CHAD: Self = Self::from_bytes(*b"chad");
    pub const COPYRIGHT: Self = Self::from_bytes(*b"cprt");
    pub const DESC: Self = Self::from_bytes(*b"desc");
    pub const GRAY_TRC: Self = Self::from_bytes(*b"kTRC");
    pub const GREEN_COLORANT: Self = Self::from_bytes(*b"gXYZ");
    pub const GREEN_TRC: Self = Self::from_bytes(*b"gTRC");
    pub const MEDIA_WHITE: Self = Self::from_bytes(*b"wtpt");
    pub const RED_COLORANT: Self = Self::from_bytes(*b"rXYZ");
    pub const RED_TRC: Self = Self::from_bytes(*b"rTRC");
}

impl fmt::Display for TagSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&fourcc(self.0))
    }
}

/// Type signatures for ICC tag data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSignature(pub u32);

impl TypeSignature {
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    pub const XYZ: Self = Self::from_bytes(*b"XYZ ");
    pub const CURVE: Self = Self::from_bytes(*b"curv");
    pub const PARA: Self = Self::from_bytes(*b"para");
    pub const TEXT: Self = Self::from_bytes(*b"text");
    pub const DESC: Self = Self::from_bytes(*b"desc");
    pub const MLUC: Self = Self::from_bytes(*b"mluc");
    pub const LUT16: Self = Self::from_bytes(*b"mft2");
    pub const SF32: Self = Self::from_bytes(*b"sf32");
}

/// Header color space signatures
pub mod color_space {
    pub const RGB: u32 = u32::from_be_bytes(*b"RGB ");
    pub const GRAY: u32 = u32::from_be_bytes(*b"GRAY");
    pub const CMYK: u32 = u32::from_be_bytes(*b"CMYK");
    pub const XYZ: u32 = u32::from_be_bytes(*b"XYZ ");
    pub const LAB: u32 = u32::from_be_bytes(*b"Lab ");
}

/// Header profile class signatures
pub mod profile_class {
    pub const DISPLAY: u32 = u32::from_be_bytes(*b"mntr");
    pub const OUTPUT: u32 = u32::from_be_bytes(*b"prtr");
}

/// Color space of a profile's data or connection space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProfileColorSpace {
    #[default]
    Other,
    Rgb,
    Grey,
    Cmyk,
    Xyz,
    Lab,
}

impl ProfileColorSpace {
    /// Map a header data color space signature
    pub fn from_data_signature(sig: u32) -> Self {
        match sig {
            color_space::RGB => Self::Rgb,
            color_space::GRAY => Self::Grey,
            color_space::CMYK => Self::Cmyk,
            _ => Self::Other,
        }
    }

    /// Map a header PCS signature
    pub fn from_pcs_signature(sig: u32) -> Self {
        match sig {
            color_space::XYZ => Self::Xyz,
            color_space::LAB => Self::Lab,
            _ => Self::Other,
        }
    }
}

/// One validated tag table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub tag: TagSignature,
    pub range: Range<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signatures() {
        assert_eq!(PROFILE_SIGNATURE, 0x6163_7370);
        assert_eq!(TagSignature::RED_TRC.to_string(), "rTRC");
        assert_eq!(fourcc(TypeSignature::XYZ.0), "XYZ ");
        assert_eq!(fourcc(0x0001_4142), "..AB");
    }

    #[test]
    fn test_color_space_mapping() {
        assert_eq!(ProfileColorSpace::from_data_signature(color_space::RGB), ProfileColorSpace::Rgb);
        assert_eq!(ProfileColorSpace::from_data_signature(color_space::CMYK), ProfileColorSpace::Cmyk);
        assert_eq!(ProfileColorSpace::from_data_signature(color_space::LAB), ProfileColorSpace::Other);
        assert_eq!(ProfileColorSpace::from_pcs_signature(color_space::LAB), ProfileColorSpace::Lab);
        assert_eq!(ProfileColorSpace::from_pcs_signature(color_space::RGB), ProfileColorSpace::Other);
    }
}
