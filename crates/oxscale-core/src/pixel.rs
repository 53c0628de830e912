//! Pixel format descriptor
//!
//! Only the parts the color engine needs to pick a profile: the channel
//! model and the channel count.

/// Channel model of a pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PixelColorRepresentation {
    #[default]
    Unspecified,
    Grey,
    Bgr,
    Rgb,
    Cmyk,
}

/// Interleaved pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    pub color_representation: PixelColorRepresentation,
    pub channels: u8,
    pub has_alpha: bool,
}

impl PixelFormat {
    pub const GREY8: Self = Self::new(PixelColorRepresentation::Grey, 1, false);
    pub const GREY_ALPHA16: Self = Self::new(PixelColorRepresentation::Grey, 2, true);
    pub const BGR24: Self = Self::new(PixelColorRepresentation::Bgr, 3, false);
    pub const BGRA32: Self = Self::new(PixelColorRepresentation::Bgr, 4, true);
    pub const RGB24: Self = Self::new(PixelColorRepresentation::Rgb, 3, false);
    pub const RGBA32: Self = Self::new(PixelColorRepresentation::Rgb, 4, true);
    pub const CMYK32: Self = Self::new(PixelColorRepresentation::Cmyk, 4, false);

    pub const fn new(
        color_representation: PixelColorRepresentation,
        channels: u8,
        has_alpha: bool,
    ) -> Self {
        Self {
            color_representation,
            channels,
            has_alpha,
        }
    }

    #[inline]
    pub fn is_grey(&self) -> bool {
        self.color_representation == PixelColorRepresentation::Grey
    }

    /// Channels carrying color, alpha excluded
    #[inline]
    pub fn color_channels(&self) -> u8 {
        self.channels - u8::from(self.has_alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_channels() {
        assert_eq!(PixelFormat::BGRA32.color_channels(), 3);
        assert_eq!(PixelFormat::GREY8.color_channels(), 1);
        assert_eq!(PixelFormat::CMYK32.color_channels(), 4);
        assert!(PixelFormat::GREY_ALPHA16.is_grey());
    }
}
