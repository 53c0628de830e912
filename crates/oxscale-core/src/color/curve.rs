//! Transfer curves
//!
//! A [`ProfileCurve`] pairs a forward table (linear → encoded) with an
//! inverse table (encoded → linear). Builders return shared instances, and
//! canonical curves are process-wide singletons compared by pointer: callers
//! check `Arc::ptr_eq(curve, ProfileCurve::srgb())` to pick a no-conversion
//! fast path.

use std::cmp::Ordering;
use std::sync::{Arc, LazyLock};

use tracing::trace;

use super::lut::{
    self, GAMMA_LENGTH, GAMMA_SCALE, INVERSE_GAMMA_LENGTH, INVERSE_GAMMA_SCALE, Table,
};
use crate::math::{RoughlyEqual, fix_to_byte, lerp};

/// Slope limit for pure power curves, per Adobe RGB (1998) Annex C
const POWER_SLOPE_LIMIT: f64 = 32.0;

static LINEAR: LazyLock<Arc<ProfileCurve>> = LazyLock::new(|| {
    Arc::new(ProfileCurve {
        gamma: None,
        inverse_gamma: Arc::clone(lut::alpha()),
    })
});

static SRGB: LazyLock<Arc<ProfileCurve>> = LazyLock::new(|| {
    Arc::new(ProfileCurve {
        gamma: Some(Arc::clone(lut::srgb_gamma())),
        inverse_gamma: Arc::clone(lut::srgb_inverse_gamma()),
    })
});

static ADOBE_RGB: LazyLock<Arc<ProfileCurve>> =
    LazyLock::new(|| Arc::new(ProfileCurve::power_tables(2.2)));

/// Paired forward and inverse transfer tables
#[derive(Debug, Clone)]
pub struct ProfileCurve {
    gamma: Option<Table>,
    inverse_gamma: Table,
}

impl ProfileCurve {
    /// The identity curve: no forward table, identity inverse ramp
    pub fn linear() -> &'static Arc<ProfileCurve> {
        &LINEAR
    }

    /// IEC 61966-2-1 sRGB curve
    pub fn srgb() -> &'static Arc<ProfileCurve> {
        &SRGB
    }

    /// Slope-limited 2.2 power curve used by Adobe RGB (1998)
    pub fn adobe_rgb() -> &'static Arc<ProfileCurve> {
        &ADOBE_RGB
    }

    /// Forward (linear → encoded) table, `None` for a linear curve
    pub fn gamma(&self) -> Option<&[f32]> {
        self.gamma.as_deref()
    }

    /// Inverse (encoded → linear) table
    pub fn inverse_gamma(&self) -> &[f32] {
        &self.inverse_gamma
    }

    pub fn is_linear(&self) -> bool {
        self.gamma.is_none()
    }

    /// Pure power-law curve
    pub fn from_power(gamma: f64) -> Arc<ProfileCurve> {
        Arc::new(Self::power_tables(gamma))
    }

    fn power_tables(gamma: f64) -> Self {
        let igt = lut::sample(INVERSE_GAMMA_LENGTH, INVERSE_GAMMA_SCALE, |v| {
            v.powf(gamma).max(v / POWER_SLOPE_LIMIT)
        });
        let inv = 1.0 / gamma;
        let gt = lut::sample(GAMMA_LENGTH, GAMMA_SCALE, |v| {
            v.powf(inv).min(v * POWER_SLOPE_LIMIT)
        });

        Self::finish(gt, igt)
    }

    /// Piecewise-linear curve through normalized 16-bit sample points
    ///
    /// Points may be non-decreasing or non-increasing. Returns `None` when
    /// they are neither, or when fewer than two are given.
    pub fn from_points(points: &[u16]) -> Option<Arc<ProfileCurve>> {
        if points.len() < 2 {
            return None;
        }

        let increasing = points.windows(2).all(|w| w[1] >= w[0]);
        let decreasing = points.windows(2).all(|w| w[1] <= w[0]);
        if !increasing && !decreasing {
            return None;
        }
        let inverse = decreasing && !increasing;

        let mut curve: Vec<f64> = points.iter().map(|&p| p as f64 / u16::MAX as f64).collect();
        let last = curve.len() - 1;
        let cscale = last as f64;

        let mut igt = vec![0f32; INVERSE_GAMMA_LENGTH];
        for (i, v) in igt.iter_mut().enumerate().take(INVERSE_GAMMA_SCALE + 1) {
            let pos = i as f64 / INVERSE_GAMMA_SCALE as f64 * cscale;
            let idx = (pos as usize).min(last - 1);
            *v = lerp(curve[idx], curve[idx + 1], pos - idx as f64) as f32;
        }

        if lut_inverts_to(&igt, lut::srgb_gamma()) {
            trace!(points = points.len(), "sampled curve matches sRGB");
            return Some(Arc::clone(Self::srgb()));
        }

        if inverse {
            curve.reverse();
        }

        let mut gt = vec![0f32; GAMMA_LENGTH];
        for (i, v) in gt.iter_mut().enumerate().take(GAMMA_SCALE + 1) {
            let val = i as f64 / GAMMA_SCALE as f64;
            let pos = match curve.binary_search_by(|p| p.partial_cmp(&val).unwrap_or(Ordering::Less)) {
                Ok(idx) => idx as f64,
                Err(0) => 0.0,
                Err(idx) if idx == curve.len() => cscale,
                Err(idx) => {
                    let (vl, vh) = (curve[idx - 1], curve[idx]);
                    if vl == vh {
                        idx as f64
                    } else {
                        (idx - 1) as f64 + (val - vl) / (vh - vl)
                    }
                }
            };
            *v = (pos / cscale) as f32;
        }

        if inverse {
            gt[..=GAMMA_SCALE].reverse();
        }

        Some(Arc::new(Self::finish(gt, igt)))
    }

    /// Seven-parameter form covering ICC `para` function types 0 to 4
    ///
    /// `y = (a·x + b)^g + c + e` for `x >= d`, else `y = c·x + f`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parameters(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64, g: f64) -> Arc<ProfileCurve> {
        if g.is_roughly_equal_to(&2.4)
            && d.is_roughly_equal_to(&0.04045)
            && a.is_roughly_equal_to(&(1.0 / 1.055))
            && b.is_roughly_equal_to(&(0.055 / 1.055))
            && c.is_roughly_equal_to(&(1.0 / 12.92))
        {
            trace!("parametric curve matches sRGB");
            return Arc::clone(Self::srgb());
        }

        let igt = lut::sample(INVERSE_GAMMA_LENGTH, INVERSE_GAMMA_SCALE, |v| {
            if v >= d {
                (v * a + b).powf(g) + c + e
            } else {
                v * c + f
            }
        });

        let inv = 1.0 / g;
        let gt = lut::sample(GAMMA_LENGTH, GAMMA_SCALE, |v| {
            if v > c * d + f {
                ((v - c - e).powf(inv) - b) / a
            } else if c == 0.0 {
                0.0
            } else {
                (v - f) / c
            }
        });

        Arc::new(Self::finish(gt, igt))
    }

    fn finish(mut gt: Vec<f32>, mut igt: Vec<f32>) -> Self {
        lut::fixup_curve(&mut gt, GAMMA_SCALE);
        lut::fixup_curve(&mut igt, INVERSE_GAMMA_SCALE);

        Self {
            gamma: Some(gt.into()),
            inverse_gamma: igt.into(),
        }
    }
}

/// True when `igt` round-trips through `gt` to every 8-bit input
fn lut_inverts_to(igt: &[f32], gt: &[f32]) -> bool {
    (0..=INVERSE_GAMMA_SCALE).all(|i| {
        let pos = igt[i] * GAMMA_SCALE as f32;
        if !(0.0..=GAMMA_SCALE as f32).contains(&pos) {
            return false;
        }

        let idx = pos as usize;
        let val = lerp(gt[idx] as f64, gt[idx + 1] as f64, (pos - idx as f32) as f64);
        usize::from(fix_to_byte(val)) == i
    })
}
