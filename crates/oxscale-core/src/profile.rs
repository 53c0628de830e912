//! Color profiles
//!
//! A [`ColorProfile`] keeps its raw ICC bytes for re-embedding and, when the
//! parser recognized a fast path, the decoded tone curve ([`CurveProfile`])
//! and colorant matrix ([`MatrixProfile`]). Canonical profiles are
//! process-wide singletons; everything else should come through
//! [`crate::cache`] so identical embedded profiles are decoded once.

use std::ops::Deref;
use std::sync::{Arc, LazyLock};

use tracing::debug;

use crate::cache;
use crate::color::ProfileCurve;
use crate::config::ColorProfileMode;
use crate::error::{Error, Result};
use crate::icc::builtin::{self, ProfileMetadata};
use crate::icc::{self, ProfileColorSpace};
use crate::math::{Matrix3x3, Vector3};
use crate::pixel::{PixelColorRepresentation, PixelFormat};

/// How much of a profile this crate can handle itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorProfileType {
    /// Valid, but no fast path
    #[default]
    Unknown,
    /// Grey with a single tone curve
    Curve,
    /// RGB with one shared tone curve and a colorant matrix
    Matrix,
    /// Needs A2B0/B2A0 evaluation by a full CMS
    Table,
}

/// A decoded tone curve
#[derive(Debug)]
pub struct CurveProfile {
    curve: Arc<ProfileCurve>,
    compact_profile: Option<Vec<u8>>,
}

impl CurveProfile {
    pub fn curve(&self) -> &Arc<ProfileCurve> {
        &self.curve
    }

    pub fn is_linear(&self) -> bool {
        self.curve.is_linear()
    }

    /// Smaller v2 serialization of the same profile, for embedding
    pub fn compact_profile(&self) -> Option<&[u8]> {
        self.compact_profile.as_deref()
    }
}

/// A decoded tone curve plus RGB→XYZ colorant matrix
#[derive(Debug)]
pub struct MatrixProfile {
    base: CurveProfile,
    matrix: Matrix3x3,
    inverse_matrix: Matrix3x3,
}

impl MatrixProfile {
    /// RGB→XYZ (D50), one column per colorant
    pub fn matrix(&self) -> &Matrix3x3 {
        &self.matrix
    }

    pub fn inverse_matrix(&self) -> &Matrix3x3 {
        &self.inverse_matrix
    }

    /// Red x or green y chromaticity outside the sRGB gamut
    pub fn is_wide_gamut(&self) -> bool {
        let chromaticity = |c: usize| {
            let col = self.matrix.column(c);
            col[c] / (col.x() + col.y() + col.z())
        };
        chromaticity(0) > 0.67 || chromaticity(1) > 0.62
    }

    fn is_equivalent_to(&self, other: &ColorProfile) -> bool {
        other.as_matrix().is_some_and(|m| {
            Arc::ptr_eq(&self.curve, &m.curve) && self.matrix.is_roughly_equal_to(&m.matrix)
        })
    }
}

impl Deref for MatrixProfile {
    type Target = CurveProfile;

    fn deref(&self) -> &CurveProfile {
        &self.base
    }
}

#[derive(Debug)]
enum Details {
    None,
    Curve(CurveProfile),
    Matrix(MatrixProfile),
}

/// A parsed ICC profile
#[derive(Debug)]
pub struct ColorProfile {
    is_valid: bool,
    bytes: Vec<u8>,
    data_color_space: ProfileColorSpace,
    pcs_color_space: ProfileColorSpace,
    profile_type: ColorProfileType,
    details: Details,
}

static INVALID: LazyLock<Arc<ColorProfile>> = LazyLock::new(|| {
    Arc::new(ColorProfile {
        is_valid: false,
        bytes: Vec::new(),
        data_color_space: ProfileColorSpace::Other,
        pcs_color_space: ProfileColorSpace::Other,
        profile_type: ColorProfileType::Unknown,
        details: Details::None,
    })
});

static SRGB: LazyLock<Arc<ColorProfile>> = LazyLock::new(|| {
    canonical_matrix(
        builtin::srgb_v4(),
        builtin::srgb_compact(),
        builtin::SRGB_COLORANTS,
        ProfileCurve::srgb(),
    )
});

static SGREY: LazyLock<Arc<ColorProfile>> = LazyLock::new(|| {
    Arc::new(ColorProfile::curve(
        builtin::sgrey_v4().to_vec(),
        Some(builtin::sgrey_compact().to_vec()),
        Arc::clone(ProfileCurve::srgb()),
        ProfileColorSpace::Grey,
        ProfileColorSpace::Xyz,
    ))
});

static ADOBE_RGB: LazyLock<Arc<ColorProfile>> = LazyLock::new(|| {
    canonical_matrix(
        builtin::adobe_rgb_v4(),
        builtin::adobe_rgb_compact(),
        builtin::ADOBE_RGB_COLORANTS,
        ProfileCurve::adobe_rgb(),
    )
});

static DISPLAY_P3: LazyLock<Arc<ColorProfile>> = LazyLock::new(|| {
    canonical_matrix(
        builtin::display_p3_v4(),
        builtin::display_p3_compact(),
        builtin::DISPLAY_P3_COLORANTS,
        ProfileCurve::srgb(),
    )
});

static CMYK_DEFAULT: LazyLock<Arc<ColorProfile>> =
    LazyLock::new(|| icc::parse(builtin::cmyk_default()));

fn canonical_matrix(
    bytes: &[u8],
    compact: &[u8],
    matrix: Matrix3x3,
    curve: &Arc<ProfileCurve>,
) -> Arc<ColorProfile> {
    Arc::new(ColorProfile::matrix(
        bytes.to_vec(),
        Some(compact.to_vec()),
        matrix,
        matrix.invert().unwrap_or_default(),
        Arc::clone(curve),
        ProfileColorSpace::Rgb,
        ProfileColorSpace::Xyz,
    ))
}

impl ColorProfile {
    pub(crate) fn unclassified(
        bytes: Vec<u8>,
        data_color_space: ProfileColorSpace,
        pcs_color_space: ProfileColorSpace,
        profile_type: ColorProfileType,
    ) -> Self {
        Self {
            is_valid: true,
            bytes,
            data_color_space,
            pcs_color_space,
            profile_type,
            details: Details::None,
        }
    }

    pub(crate) fn curve(
        bytes: Vec<u8>,
        compact_profile: Option<Vec<u8>>,
        curve: Arc<ProfileCurve>,
        data_color_space: ProfileColorSpace,
        pcs_color_space: ProfileColorSpace,
    ) -> Self {
        Self {
            details: Details::Curve(CurveProfile {
                curve,
                compact_profile,
            }),
            ..Self::unclassified(bytes, data_color_space, pcs_color_space, ColorProfileType::Curve)
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn matrix(
        bytes: Vec<u8>,
        compact_profile: Option<Vec<u8>>,
        matrix: Matrix3x3,
        inverse_matrix: Matrix3x3,
        curve: Arc<ProfileCurve>,
        data_color_space: ProfileColorSpace,
        pcs_color_space: ProfileColorSpace,
    ) -> Self {
        Self {
            details: Details::Matrix(MatrixProfile {
                base: CurveProfile {
                    curve,
                    compact_profile,
                },
                matrix,
                inverse_matrix,
            }),
            ..Self::unclassified(bytes, data_color_space, pcs_color_space, ColorProfileType::Matrix)
        }
    }

    /// Shared sentinel for rejected profiles
    pub fn invalid() -> &'static Arc<ColorProfile> {
        &INVALID
    }

    /// IEC 61966-2-1 sRGB
    pub fn srgb() -> &'static Arc<ColorProfile> {
        &SRGB
    }

    /// Grey with the sRGB tone curve
    pub fn sgrey() -> &'static Arc<ColorProfile> {
        &SGREY
    }

    /// Adobe RGB (1998) compatible
    pub fn adobe_rgb() -> &'static Arc<ColorProfile> {
        &ADOBE_RGB
    }

    pub fn display_p3() -> &'static Arc<ColorProfile> {
        &DISPLAY_P3
    }

    /// Built-in CMYK profile, classified [`ColorProfileType::Table`]
    ///
    /// An uncalibrated placeholder, see [`builtin::cmyk_default`].
    pub fn cmyk_default() -> &'static Arc<ColorProfile> {
        &CMYK_DEFAULT
    }

    /// Parse without caching; see [`cache::get_or_add`]
    pub fn parse(bytes: &[u8]) -> Arc<ColorProfile> {
        icc::parse(bytes)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Raw ICC bytes, empty for the invalid sentinel
    pub fn profile_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn data_color_space(&self) -> ProfileColorSpace {
        self.data_color_space
    }

    pub fn pcs_color_space(&self) -> ProfileColorSpace {
        self.pcs_color_space
    }

    pub fn profile_type(&self) -> ColorProfileType {
        self.profile_type
    }

    /// Tone curve of a Curve or Matrix profile
    pub fn as_curve(&self) -> Option<&CurveProfile> {
        match &self.details {
            Details::Curve(c) => Some(c),
            Details::Matrix(m) => Some(&m.base),
            Details::None => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&MatrixProfile> {
        match &self.details {
            Details::Matrix(m) => Some(m),
            _ => None,
        }
    }

    /// Profile assumed for untagged images
    pub fn default_for(fmt: &PixelFormat) -> &'static Arc<ColorProfile> {
        match fmt.color_representation {
            PixelColorRepresentation::Cmyk => Self::cmyk_default(),
            PixelColorRepresentation::Grey => Self::sgrey(),
            _ => Self::srgb(),
        }
    }

    /// Whether pixels of `fmt` can be interpreted with this profile
    pub fn is_compatible_with(&self, fmt: &PixelFormat) -> bool {
        use PixelColorRepresentation as Pcr;

        matches!(
            (self.data_color_space, fmt.color_representation),
            (ProfileColorSpace::Cmyk, Pcr::Cmyk)
                | (ProfileColorSpace::Grey, Pcr::Grey)
                | (ProfileColorSpace::Rgb, Pcr::Rgb | Pcr::Bgr)
        )
    }

    /// Swap a parsed profile for the canonical one it is equivalent to
    pub fn source_profile(prof: &Arc<ColorProfile>, mode: ColorProfileMode) -> Arc<ColorProfile> {
        if mode == ColorProfileMode::Preserve {
            return Arc::clone(prof);
        }

        let sgrey_curve = Self::sgrey().as_curve().map(CurveProfile::curve);
        if prof.profile_type == ColorProfileType::Curve
            && prof
                .as_curve()
                .zip(sgrey_curve)
                .is_some_and(|(c, s)| Arc::ptr_eq(c.curve(), s))
        {
            return Arc::clone(Self::sgrey());
        }

        if let Some(m) = prof.as_matrix() {
            for canonical in [Self::srgb(), Self::display_p3(), Self::adobe_rgb()] {
                if m.is_equivalent_to(canonical) {
                    return Arc::clone(canonical);
                }
            }
        }

        Arc::clone(prof)
    }

    /// Working/output profile for a source profile
    pub fn dest_profile(prof: &Arc<ColorProfile>, mode: ColorProfileMode) -> Arc<ColorProfile> {
        if mode == ColorProfileMode::Preserve {
            return Arc::clone(prof);
        }

        if mode <= ColorProfileMode::NormalizeAndEmbed {
            if Arc::ptr_eq(prof, Self::adobe_rgb())
                || prof.data_color_space == ProfileColorSpace::Cmyk
            {
                return Arc::clone(Self::adobe_rgb());
            }

            if prof.profile_type == ColorProfileType::Curve {
                return Arc::clone(Self::sgrey());
            }

            if prof.as_matrix().is_none_or(MatrixProfile::is_wide_gamut) {
                return Arc::clone(Self::display_p3());
            }
        }

        if prof.profile_type == ColorProfileType::Curve {
            Arc::clone(Self::sgrey())
        } else {
            Arc::clone(Self::srgb())
        }
    }

    /// Synthesize a profile from legacy gamma/chromaticity metadata
    ///
    /// The sRGB (or sGrey, for grey formats) template is patched and the
    /// result goes through the profile cache like any embedded profile.
    pub fn create_from_metadata(
        fmt: &PixelFormat,
        meta: &ProfileMetadata,
    ) -> Result<Arc<ColorProfile>> {
        if !meta.gamma.is_finite() || meta.gamma < 0.0 {
            return Err(Error::InvalidMetadata(format!("gamma {}", meta.gamma)));
        }

        let points = [meta.white, meta.red, meta.green, meta.blue];
        if points
            .iter()
            .flat_map(Vector3::to_array)
            .any(|v| !v.is_finite() || v < 0.0)
        {
            return Err(Error::InvalidMetadata(
                "chromaticities must be finite and non-negative".into(),
            ));
        }

        let grey = fmt.is_grey();
        if !grey && meta.has_chromaticities() {
            let primaries = Matrix3x3::from_columns(meta.red, meta.green, meta.blue);
            if meta.white.y() == 0.0 || primaries.invert().is_none() {
                return Err(Error::InvalidMetadata("degenerate primaries".into()));
            }
        }

        let bytes = builtin::patch_template(grey, meta);
        debug!(
            name = %String::from_utf8_lossy(&meta.name),
            grey,
            gamma = meta.gamma,
            len = bytes.len(),
            "synthesized profile from metadata"
        );

        Ok(cache::get_or_add(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icc::builtin::D65;

    #[test]
    fn test_invalid_sentinel() {
        let p = ColorProfile::invalid();
        assert!(!p.is_valid());
        assert!(p.profile_bytes().is_empty());
        assert!(p.as_curve().is_none());
        assert!(Arc::ptr_eq(p, &ColorProfile::parse(&[0; 10])));
    }

    #[test]
    fn test_canonical_profiles() {
        let srgb = ColorProfile::srgb();
        assert_eq!(srgb.profile_type(), ColorProfileType::Matrix);
        assert_eq!(srgb.data_color_space(), ProfileColorSpace::Rgb);
        assert!(srgb.as_matrix().unwrap().compact_profile().is_some());

        let sgrey = ColorProfile::sgrey();
        assert_eq!(sgrey.profile_type(), ColorProfileType::Curve);
        assert!(Arc::ptr_eq(sgrey.as_curve().unwrap().curve(), ProfileCurve::srgb()));

        let cmyk = ColorProfile::cmyk_default();
        assert!(cmyk.is_valid());
        assert_eq!(cmyk.profile_type(), ColorProfileType::Table);
        assert_eq!(cmyk.data_color_space(), ProfileColorSpace::Cmyk);
        assert_eq!(cmyk.pcs_color_space(), ProfileColorSpace::Lab);
    }

    #[test]
    fn test_canonical_bytes_parse_to_same_model() {
        for canonical in [
            ColorProfile::srgb(),
            ColorProfile::adobe_rgb(),
            ColorProfile::display_p3(),
        ] {
            let expected = canonical.as_matrix().unwrap();
            let parsed = ColorProfile::parse(canonical.profile_bytes());
            let m = parsed.as_matrix().unwrap();
            assert!(m.matrix().is_roughly_equal_to(expected.matrix()));
            assert!(Arc::ptr_eq(m.curve(), expected.curve()));

            let compact = ColorProfile::parse(expected.compact_profile().unwrap());
            assert!(compact.as_matrix().unwrap().matrix().is_roughly_equal_to(expected.matrix()));
            assert!(Arc::ptr_eq(compact.as_curve().unwrap().curve(), expected.curve()));
        }
    }

    #[test]
    fn test_srgb_matrix() {
        let m = ColorProfile::srgb().as_matrix().unwrap().matrix();
        assert!((m[(0, 0)] - 0.4360).abs() < 1e-4);
        assert!((m[(1, 0)] - 0.2224).abs() < 1e-4);
        let round_trip = *m * *ColorProfile::srgb().as_matrix().unwrap().inverse_matrix();
        assert!(round_trip.is_roughly_equal_to(&Matrix3x3::IDENTITY));
    }

    #[test]
    fn test_wide_gamut() {
        assert!(!ColorProfile::srgb().as_matrix().unwrap().is_wide_gamut());
        assert!(ColorProfile::display_p3().as_matrix().unwrap().is_wide_gamut());
        assert!(ColorProfile::adobe_rgb().as_matrix().unwrap().is_wide_gamut());
    }

    #[test]
    fn test_default_and_compatibility() {
        assert!(Arc::ptr_eq(
            ColorProfile::default_for(&PixelFormat::GREY8),
            ColorProfile::sgrey()
        ));
        assert!(Arc::ptr_eq(
            ColorProfile::default_for(&PixelFormat::CMYK32),
            ColorProfile::cmyk_default()
        ));
        assert!(Arc::ptr_eq(
            ColorProfile::default_for(&PixelFormat::BGRA32),
            ColorProfile::srgb()
        ));

        assert!(ColorProfile::srgb().is_compatible_with(&PixelFormat::BGR24));
        assert!(!ColorProfile::srgb().is_compatible_with(&PixelFormat::GREY8));
        assert!(ColorProfile::cmyk_default().is_compatible_with(&PixelFormat::CMYK32));
        assert!(!ColorProfile::invalid().is_compatible_with(&PixelFormat::RGB24));
    }

    #[test]
    fn test_source_profile_canonicalizes() {
        let parsed = ColorProfile::parse(ColorProfile::display_p3().profile_bytes());
        assert!(!Arc::ptr_eq(&parsed, ColorProfile::display_p3()));

        let src = ColorProfile::source_profile(&parsed, ColorProfileMode::Normalize);
        assert!(Arc::ptr_eq(&src, ColorProfile::display_p3()));

        let kept = ColorProfile::source_profile(&parsed, ColorProfileMode::Preserve);
        assert!(Arc::ptr_eq(&kept, &parsed));

        let grey = ColorProfile::parse(builtin::sgrey_compact());
        let src = ColorProfile::source_profile(&grey, ColorProfileMode::ConvertToSrgb);
        assert!(Arc::ptr_eq(&src, ColorProfile::sgrey()));
    }

    #[test]
    fn test_dest_profile() {
        let dest = |p: &Arc<ColorProfile>, mode| ColorProfile::dest_profile(p, mode);
        let n = ColorProfileMode::Normalize;

        assert!(Arc::ptr_eq(&dest(ColorProfile::adobe_rgb(), n), ColorProfile::adobe_rgb()));
        assert!(Arc::ptr_eq(&dest(ColorProfile::cmyk_default(), n), ColorProfile::adobe_rgb()));
        assert!(Arc::ptr_eq(&dest(ColorProfile::sgrey(), n), ColorProfile::sgrey()));
        assert!(Arc::ptr_eq(&dest(ColorProfile::display_p3(), n), ColorProfile::display_p3()));
        assert!(Arc::ptr_eq(&dest(ColorProfile::srgb(), n), ColorProfile::srgb()));
        assert!(Arc::ptr_eq(&dest(ColorProfile::invalid(), n), ColorProfile::display_p3()));

        let to_srgb = ColorProfileMode::ConvertToSrgb;
        assert!(Arc::ptr_eq(&dest(ColorProfile::display_p3(), to_srgb), ColorProfile::srgb()));
        assert!(Arc::ptr_eq(&dest(ColorProfile::sgrey(), to_srgb), ColorProfile::sgrey()));

        let p3 = ColorProfile::display_p3();
        assert!(Arc::ptr_eq(&dest(p3, ColorProfileMode::Preserve), p3));
    }

    #[test]
    fn test_create_from_metadata_gamma() {
        let meta = ProfileMetadata {
            name: *b"gAMA",
            gamma: 1.0 / 1.8,
            ..Default::default()
        };
        let prof = ColorProfile::create_from_metadata(&PixelFormat::RGB24, &meta).unwrap();
        assert_eq!(prof.profile_type(), ColorProfileType::Matrix);
        assert!(!Arc::ptr_eq(prof.as_curve().unwrap().curve(), ProfileCurve::srgb()));
        assert!(
            prof.as_matrix()
                .unwrap()
                .matrix()
                .is_roughly_equal_to(&builtin::SRGB_COLORANTS)
        );

        let again = ColorProfile::create_from_metadata(&PixelFormat::RGB24, &meta).unwrap();
        assert!(Arc::ptr_eq(&prof, &again));
    }

    #[test]
    fn test_create_from_metadata_chromaticities() {
        // Rec.709 primaries with D65 white reproduce the sRGB colorants
        let xyz = |x: f64, y: f64| Vector3::new(x / y, 1.0, (1.0 - x - y) / y);
        let meta = ProfileMetadata {
            name: *b"cHRM",
            gamma: 0.0,
            white: D65,
            red: xyz(0.64, 0.33),
            green: xyz(0.30, 0.60),
            blue: xyz(0.15, 0.06),
        };
        let prof = ColorProfile::create_from_metadata(&PixelFormat::RGBA32, &meta).unwrap();
        let m = prof.as_matrix().unwrap();
        assert!(m.matrix().is_roughly_equal_to(&builtin::SRGB_COLORANTS));
        assert!(Arc::ptr_eq(m.curve(), ProfileCurve::srgb()));
    }

    #[test]
    fn test_create_from_metadata_grey() {
        let meta = ProfileMetadata {
            name: *b"gAMA",
            gamma: 1.0,
            ..Default::default()
        };
        let prof = ColorProfile::create_from_metadata(&PixelFormat::GREY8, &meta).unwrap();
        assert_eq!(prof.profile_type(), ColorProfileType::Curve);
        assert!(prof.as_curve().unwrap().is_linear());
    }

    #[test]
    fn test_create_from_metadata_rejects() {
        let bad_gamma = ProfileMetadata {
            gamma: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            ColorProfile::create_from_metadata(&PixelFormat::RGB24, &bad_gamma),
            Err(Error::InvalidMetadata(_))
        ));

        let v = Vector3::new(0.3, 0.3, 0.3);
        let degenerate = ProfileMetadata {
            white: D65,
            red: v,
            green: v,
            blue: v,
            ..Default::default()
        };
        assert!(ColorProfile::create_from_metadata(&PixelFormat::RGB24, &degenerate).is_err());
    }
}
