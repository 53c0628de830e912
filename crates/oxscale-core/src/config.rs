//! Processing options
//!
//! With the `serde` feature, options load from JSON:
//!
//! ```json
//! { "color_profile_mode": "normalize_and_embed", "interpolation": "lanczos", "blur": 1.1 }
//! ```

use crate::error::{Error, Result};
use crate::resample::{InterpolationKind, InterpolationSettings, KernelMap};

/// What to do with embedded color profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ColorProfileMode {
    /// Convert to a well-known RGB space, embed a profile unless sRGB
    #[default]
    Normalize,
    /// Convert to a well-known RGB space, always embed a profile
    NormalizeAndEmbed,
    /// Keep the source space and profile
    Preserve,
    /// Convert to untagged sRGB
    ConvertToSrgb,
    /// Treat the input as sRGB
    Ignore,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ProcessingOptions {
    pub color_profile_mode: ColorProfileMode,
    pub interpolation: InterpolationKind,
    /// Overrides the preset's blur factor
    pub blur: Option<f64>,
    /// Gaussian sigma of the sharpening blur, 0 to disable
    pub blur_radius: f64,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            color_profile_mode: ColorProfileMode::Normalize,
            interpolation: InterpolationKind::default(),
            blur: None,
            blur_radius: 0.0,
        }
    }
}

impl ProcessingOptions {
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.blur_radius >= 0.0 && self.blur_radius.is_finite()) {
            return Err(Error::InvalidInterpolator(format!(
                "blur radius {}",
                self.blur_radius
            )));
        }
        self.interpolation_settings().map(|_| ())
    }

    /// The preset with the blur override applied
    pub fn interpolation_settings(&self) -> Result<InterpolationSettings> {
        let preset = self.interpolation.settings();
        match self.blur {
            Some(blur) => preset.with_blur(blur),
            None => Ok(preset),
        }
    }

    /// Sharpening blur map for a `size`-pixel axis, if enabled
    pub fn blur_map(&self, size: usize) -> Option<KernelMap> {
        (self.blur_radius > 0.0).then(|| KernelMap::make_blur_map(size, self.blur_radius))
    }
}
