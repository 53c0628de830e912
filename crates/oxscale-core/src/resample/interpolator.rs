//! Interpolation weighting functions and presets

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use super::gaussian::GaussianFactory;
use crate::error::{Error, Result};

/// Valid range for [`InterpolationSettings::blur`]
pub const BLUR_RANGE: std::ops::RangeInclusive<f64> = 0.5..=1.5;

/// A symmetric 1-D weighting function
pub trait Interpolator: fmt::Debug + Send + Sync {
    /// Distance beyond which every weight is zero
    fn support(&self) -> f64;

    /// Weight at non-negative distance `d`
    fn weight(&self, d: f64) -> f64;
}

/// Nearest neighbor
#[derive(Debug, Clone, Copy, Default)]
pub struct Point;

impl Interpolator for Point {
    fn support(&self) -> f64 {
        0.000001
    }

    fn weight(&self, _d: f64) -> f64 {
        1.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoxFilter;

impl Interpolator for BoxFilter {
    fn support(&self) -> f64 {
        0.5
    }

    fn weight(&self, d: f64) -> f64 {
        if d <= 0.5 { 1.0 } else { 0.0 }
    }
}

/// Triangle filter
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl Interpolator for Linear {
    fn support(&self) -> f64 {
        1.0
    }

    fn weight(&self, d: f64) -> f64 {
        if d < 1.0 { 1.0 - d } else { 0.0 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Gaussian {
    gauss: GaussianFactory,
}

impl Gaussian {
    pub fn new(sigma: f64) -> Result<Self> {
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(Error::InvalidInterpolator(format!("gaussian sigma {sigma}")));
        }
        Ok(Self {
            gauss: GaussianFactory::new(sigma),
        })
    }
}

impl Interpolator for Gaussian {
    fn support(&self) -> f64 {
        self.gauss.support()
    }

    fn weight(&self, d: f64) -> f64 {
        if d < self.support() { self.gauss.value(d) } else { 0.0 }
    }
}

/// Dodgson's quadratic, `r` in [0.5, 1.0]
#[derive(Debug, Clone, Copy)]
pub struct Quadratic {
    r: f64,
}

impl Quadratic {
    pub fn new(r: f64) -> Result<Self> {
        if !(0.5..=1.0).contains(&r) {
            return Err(Error::InvalidInterpolator(format!("quadratic r {r}")));
        }
        Ok(Self { r })
    }
}

impl Default for Quadratic {
    fn default() -> Self {
        Self { r: 1.0 }
    }
}

impl Interpolator for Quadratic {
    fn support(&self) -> f64 {
        1.5
    }

    fn weight(&self, d: f64) -> f64 {
        let r = self.r;
        if d < 0.5 {
            -2.0 * r * (d * d) + 0.5 * (r + 1.0)
        } else if d < 1.5 {
            r * (d * d) + (-2.0 * r - 0.5) * d + 0.75 * (r + 1.0)
        } else {
            0.0
        }
    }
}

/// Mitchell-Netravali family cubic with parameters B and C
#[derive(Debug, Clone, Copy)]
pub struct Cubic {
    support: f64,
    p: [f64; 3],
    q: [f64; 4],
}

impl Cubic {
    pub fn new(b: f64, c: f64) -> Result<Self> {
        if !(b >= 0.0 && c >= 0.0) {
            return Err(Error::InvalidInterpolator(format!("cubic b {b}, c {c}")));
        }
        Ok(Self::with_params(b, c))
    }

    fn with_params(b: f64, c: f64) -> Self {
        Self {
            support: if b == 0.0 && c == 0.0 { 1.0 } else { 2.0 },
            p: [
                (6.0 - 2.0 * b) / 6.0,
                (-18.0 + 12.0 * b + c * 6.0) / 6.0,
                (12.0 - 9.0 * b - c * 6.0) / 6.0,
            ],
            q: [
                (8.0 * b + c * 24.0) / 6.0,
                (-12.0 * b - c * 48.0) / 6.0,
                (6.0 * b + c * 30.0) / 6.0,
                (-b - c * 6.0) / 6.0,
            ],
        }
    }
}

impl Interpolator for Cubic {
    fn support(&self) -> f64 {
        self.support
    }

    fn weight(&self, d: f64) -> f64 {
        let [p0, p2, p3] = self.p;
        let [q0, q1, q2, q3] = self.q;
        if d < 1.0 {
            p0 + d * d * (p2 + d * p3)
        } else if self.support > 1.0 && d < 2.0 {
            q0 + d * (q1 + d * (q2 + d * q3))
        } else {
            0.0
        }
    }
}

/// Windowed sinc
#[derive(Debug, Clone, Copy)]
pub struct Lanczos {
    lobes: f64,
}

impl Lanczos {
    pub fn new(lobes: u32) -> Result<Self> {
        if lobes == 0 {
            return Err(Error::InvalidInterpolator("lanczos with 0 lobes".into()));
        }
        Ok(Self {
            lobes: lobes as f64,
        })
    }
}

impl Default for Lanczos {
    fn default() -> Self {
        Self { lobes: 3.0 }
    }
}

impl Interpolator for Lanczos {
    fn support(&self) -> f64 {
        self.lobes
    }

    fn weight(&self, d: f64) -> f64 {
        if d == 0.0 {
            return 1.0;
        }
        if d >= self.lobes {
            return 0.0;
        }

        let x = d * PI;
        self.lobes * x.sin() * (x / self.lobes).sin() / (x * x)
    }
}

/// Dersch's 36-tap spline
#[derive(Debug, Clone, Copy, Default)]
pub struct Spline36;

impl Interpolator for Spline36 {
    fn support(&self) -> f64 {
        3.0
    }

    fn weight(&self, d: f64) -> f64 {
        if d < 1.0 {
            ((13.0 / 11.0 * d - 453.0 / 209.0) * d - 3.0 / 209.0) * d + 1.0
        } else if d < 2.0 {
            let d = d - 1.0;
            ((-6.0 / 11.0 * d + 270.0 / 209.0) * d - 156.0 / 209.0) * d
        } else if d < 3.0 {
            let d = d - 2.0;
            ((1.0 / 11.0 * d - 45.0 / 209.0) * d + 26.0 / 209.0) * d
        } else {
            0.0
        }
    }
}

/// A weighting function plus a blur factor that widens (>1) or narrows
/// (<1) its footprint
#[derive(Debug, Clone)]
pub struct InterpolationSettings {
    weighting: Arc<dyn Interpolator>,
    blur: f64,
}

impl InterpolationSettings {
    pub fn new(weighting: Arc<dyn Interpolator>, blur: f64) -> Result<Self> {
        if !BLUR_RANGE.contains(&blur) {
            return Err(Error::BlurOutOfRange(blur));
        }
        Ok(Self { weighting, blur })
    }

    fn preset(weighting: impl Interpolator + 'static, blur: f64) -> Self {
        Self {
            weighting: Arc::new(weighting),
            blur,
        }
    }

    pub fn weighting(&self) -> &dyn Interpolator {
        &*self.weighting
    }

    pub fn blur(&self) -> f64 {
        self.blur
    }

    /// Same weighting function with another blur factor
    pub fn with_blur(&self, blur: f64) -> Result<Self> {
        Self::new(Arc::clone(&self.weighting), blur)
    }

    /// Nearest-neighbor-like support, sampled at pixel centers
    pub fn is_point_sampler(&self) -> bool {
        self.weighting.support() <= 0.1
    }
}

/// Named interpolation presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InterpolationKind {
    NearestNeighbor,
    Average,
    Linear,
    Hermite,
    Quadratic,
    Mitchell,
    #[default]
    CatmullRom,
    Cubic,
    CubicSmoother,
    Lanczos,
    Spline36,
}

const PRESET_NAMES: &[(&str, InterpolationKind)] = &[
    ("average", InterpolationKind::Average),
    ("catmull_rom", InterpolationKind::CatmullRom),
    ("cubic", InterpolationKind::Cubic),
    ("cubic_smoother", InterpolationKind::CubicSmoother),
    ("hermite", InterpolationKind::Hermite),
    ("lanczos", InterpolationKind::Lanczos),
    ("linear", InterpolationKind::Linear),
    ("mitchell", InterpolationKind::Mitchell),
    ("nearest_neighbor", InterpolationKind::NearestNeighbor),
    ("quadratic", InterpolationKind::Quadratic),
    ("spline36", InterpolationKind::Spline36),
];

impl InterpolationKind {
    /// Look up a preset by its snake_case name, ignoring case
    pub fn from_name(name: &str) -> Result<Self> {
        let key = name.trim().to_ascii_lowercase();
        PRESET_NAMES
            .binary_search_by(|(n, _)| n.cmp(&key.as_str()))
            .map(|i| PRESET_NAMES[i].1)
            .map_err(|_| Error::UnknownPreset(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        PRESET_NAMES
            .iter()
            .find(|(_, k)| *k == self)
            .map_or("", |(n, _)| n)
    }

    pub fn settings(self) -> InterpolationSettings {
        use InterpolationSettings as S;

        match self {
            Self::NearestNeighbor => S::preset(Point, 1.0),
            Self::Average => S::preset(BoxFilter, 1.0),
            Self::Linear => S::preset(Linear, 1.0),
            Self::Hermite => S::preset(Cubic::with_params(0.0, 0.0), 1.0),
            Self::Quadratic => S::preset(Quadratic::default(), 1.0),
            Self::Mitchell => S::preset(Cubic::with_params(1.0 / 3.0, 1.0 / 3.0), 1.0),
            Self::CatmullRom => S::preset(Cubic::with_params(0.0, 0.5), 1.0),
            Self::Cubic => S::preset(Cubic::with_params(0.0, 1.0), 1.0),
            Self::CubicSmoother => S::preset(Cubic::with_params(0.0, 0.625), 1.15),
            Self::Lanczos => S::preset(Lanczos::default(), 1.0),
            Self::Spline36 => S::preset(Spline36, 1.0),
        }
    }
}

impl fmt::Display for InterpolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [InterpolationKind; 11] = [
        InterpolationKind::NearestNeighbor,
        InterpolationKind::Average,
        InterpolationKind::Linear,
        InterpolationKind::Hermite,
        InterpolationKind::Quadratic,
        InterpolationKind::Mitchell,
        InterpolationKind::CatmullRom,
        InterpolationKind::Cubic,
        InterpolationKind::CubicSmoother,
        InterpolationKind::Lanczos,
        InterpolationKind::Spline36,
    ];

    #[test]
    fn test_supports() {
        let support = |k: InterpolationKind| k.settings().weighting().support();
        assert_eq!(support(InterpolationKind::Average), 0.5);
        assert_eq!(support(InterpolationKind::Linear), 1.0);
        assert_eq!(support(InterpolationKind::Hermite), 1.0);
        assert_eq!(support(InterpolationKind::Quadratic), 1.5);
        assert_eq!(support(InterpolationKind::CatmullRom), 2.0);
        assert_eq!(support(InterpolationKind::Lanczos), 3.0);
        assert_eq!(support(InterpolationKind::Spline36), 3.0);
        assert!(InterpolationKind::NearestNeighbor.settings().is_point_sampler());
        assert_eq!(Gaussian::new(0.5).unwrap().support(), 1.5);
    }

    #[test]
    fn test_weights_at_center_and_support() {
        for kind in &ALL[1..] {
            let s = kind.settings();
            let w = s.weighting();
            assert!(w.weight(0.0) > 0.0, "{kind}");
            assert_eq!(w.weight(w.support() + 0.01), 0.0, "{kind}");
        }
    }

    #[test]
    fn test_interpolating_kernels_pass_through_integers() {
        for kind in [
            InterpolationKind::Linear,
            InterpolationKind::CatmullRom,
            InterpolationKind::Lanczos,
        ] {
            let s = kind.settings();
            let w = s.weighting();
            assert!((w.weight(0.0) - 1.0).abs() < 1e-12, "{kind}");
            assert!(w.weight(1.0).abs() < 1e-12, "{kind}");
            assert!(w.weight(2.0).abs() < 1e-12, "{kind}");
        }
        assert!((Spline36.weight(0.0) - 1.0).abs() < 1e-12);
        assert!(Spline36.weight(1.0).abs() < 1e-12);
    }

    #[test]
    fn test_parameter_validation() {
        assert!(Gaussian::new(0.0).is_err());
        assert!(Quadratic::new(0.4).is_err());
        assert!(Quadratic::new(0.75).is_ok());
        assert!(Cubic::new(-0.1, 0.5).is_err());
        assert!(Lanczos::new(0).is_err());
        assert_eq!(Lanczos::new(2).unwrap().support(), 2.0);
    }

    #[test]
    fn test_blur_range() {
        let linear = InterpolationKind::Linear.settings();
        assert!(linear.with_blur(0.5).is_ok());
        assert!(linear.with_blur(1.5).is_ok());
        assert!(matches!(linear.with_blur(1.6), Err(Error::BlurOutOfRange(_))));
        assert!(matches!(linear.with_blur(0.4), Err(Error::BlurOutOfRange(_))));
        assert!(linear.with_blur(f64::NAN).is_err());
        assert_eq!(InterpolationKind::CubicSmoother.settings().blur(), 1.15);
    }

    #[test]
    fn test_preset_names() {
        assert!(PRESET_NAMES.windows(2).all(|w| w[0].0 < w[1].0));
        for kind in ALL {
            assert_eq!(InterpolationKind::from_name(kind.name()).unwrap(), kind);
        }
        assert_eq!(
            InterpolationKind::from_name("Catmull_Rom").unwrap(),
            InterpolationKind::CatmullRom
        );
        assert!(matches!(
            InterpolationKind::from_name("bicubic"),
            Err(Error::UnknownPreset(_))
        ));
    }
}
