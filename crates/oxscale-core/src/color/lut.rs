//! Transfer-curve lookup tables
//!
//! Float tables are sampled on a fixed grid and padded past their scale so
//! interpolating readers may overrun by one (or, for UQ15 gathers, four)
//! entries. Shared canonical tables are built once per process.

use std::sync::{Arc, LazyLock};

use multiversion::multiversion;

use crate::math::fixed::{VIDEO_LUMA_MAX, VIDEO_LUMA_MIN, fix_to_byte, fix_to_uq15_one, lerp};
use crate::math::UQ15_ONE;

/// Forward (linear → encoded) table grid
pub const GAMMA_SCALE: usize = 1023;
pub const GAMMA_LENGTH: usize = GAMMA_SCALE + 2;

/// Forward table grid for UQ15 input
pub const GAMMA_SCALE_UQ15: usize = UQ15_ONE as usize;
pub const GAMMA_LENGTH_UQ15: usize = GAMMA_SCALE_UQ15 + 4;

/// Inverse (encoded → linear) table grid, indexed by an 8-bit value
pub const INVERSE_GAMMA_SCALE: usize = u8::MAX as usize;
pub const INVERSE_GAMMA_LENGTH: usize = INVERSE_GAMMA_SCALE + 2;

/// Shared float table
pub type Table = Arc<[f32]>;

struct SrgbGamma {
    float: Table,
    uq15: Arc<[u8]>,
}

struct SrgbInverseGamma {
    float: Table,
    uq15: Arc<[u16]>,
}

static ALPHA: LazyLock<Table> = LazyLock::new(|| {
    let mut tbl = sample(INVERSE_GAMMA_LENGTH, INVERSE_GAMMA_SCALE, |v| v);
    fixup_curve(&mut tbl, INVERSE_GAMMA_SCALE);
    tbl.into()
});

// IEC 61966-2-1
static SRGB_GAMMA: LazyLock<SrgbGamma> = LazyLock::new(|| {
    let mut tbl = sample(GAMMA_LENGTH, GAMMA_SCALE, srgb_encode);
    fixup_curve(&mut tbl, GAMMA_SCALE);
    let uq15 = make_uq15_gamma(&tbl);
    SrgbGamma {
        float: tbl.into(),
        uq15,
    }
});

static SRGB_INVERSE_GAMMA: LazyLock<SrgbInverseGamma> = LazyLock::new(|| {
    let mut tbl = sample(INVERSE_GAMMA_LENGTH, INVERSE_GAMMA_SCALE, srgb_decode);
    fixup_curve(&mut tbl, INVERSE_GAMMA_SCALE);

    let mut uq15 = vec![0u16; INVERSE_GAMMA_LENGTH];
    for (i, q) in uq15.iter_mut().enumerate() {
        *q = fix_to_uq15_one(srgb_decode(i as f64 / INVERSE_GAMMA_SCALE as f64));
    }
    fixup(&mut uq15, INVERSE_GAMMA_SCALE);

    SrgbInverseGamma {
        float: tbl.into(),
        uq15: uq15.into(),
    }
});

/// sRGB encoding of a linear value
#[inline]
pub fn srgb_encode(d: f64) -> f64 {
    if d <= 0.04045 / 12.92 {
        d * 12.92
    } else {
        1.055 * d.powf(1.0 / 2.4) - 0.055
    }
}

/// sRGB decoding of an encoded value
#[inline]
pub fn srgb_decode(d: f64) -> f64 {
    if d <= 0.04045 {
        d / 12.92
    } else {
        ((d + 0.055) / 1.055).powf(2.4)
    }
}

/// Identity ramp, used as the inverse table of a linear curve
pub fn alpha() -> &'static Table {
    &ALPHA
}

pub fn srgb_gamma() -> &'static Table {
    &SRGB_GAMMA.float
}

pub fn srgb_gamma_uq15() -> &'static Arc<[u8]> {
    &SRGB_GAMMA.uq15
}

pub fn srgb_inverse_gamma() -> &'static Table {
    &SRGB_INVERSE_GAMMA.float
}

pub fn srgb_inverse_gamma_uq15() -> &'static Arc<[u16]> {
    &SRGB_INVERSE_GAMMA.uq15
}

/// Sample `f` over `[0, 1]` at `len` points spaced `1 / scale` apart
pub(crate) fn sample(len: usize, scale: usize, f: impl Fn(f64) -> f64) -> Vec<f32> {
    (0..len).map(|i| f(i as f64 / scale as f64) as f32).collect()
}

/// Copy the entry at `max_valid` into every padding slot after it
pub fn fixup<T: Copy>(t: &mut [T], max_valid: usize) {
    if let Some(&last) = t.get(max_valid) {
        t[max_valid + 1..].fill(last);
    }
}

/// Sanitize a float table and make it monotonic, then pad it
///
/// Non-finite entries take the previous entry's value (0 at the start).
/// Local dips against the table's overall direction are flattened.
pub fn fixup_curve(t: &mut [f32], max_valid: usize) {
    let Some(valid) = t.get_mut(..=max_valid) else {
        return;
    };

    let mut prev = 0.0f32;
    for v in valid.iter_mut() {
        if !v.is_finite() {
            *v = prev;
        }
        prev = *v;
    }

    let increasing = valid[max_valid] >= valid[0];
    for i in 1..valid.len() {
        let p = valid[i - 1];
        if (increasing && valid[i] < p) || (!increasing && valid[i] > p) {
            valid[i] = p;
        }
    }

    fixup(t, max_valid);
}

/// True when every entry is >= its predecessor
pub fn is_non_decreasing(t: &[f32]) -> bool {
    t.windows(2).all(|w| w[1] >= w[0])
}

#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
fn fill_uq15_gamma(gt: &[f32], out: &mut [u8]) {
    for (i, q) in out.iter_mut().enumerate() {
        let pos = i as f64 / GAMMA_SCALE_UQ15 as f64 * GAMMA_SCALE as f64;
        let idx = (pos as usize).min(gt.len() - 2);
        *q = fix_to_byte(lerp(gt[idx] as f64, gt[idx + 1] as f64, pos - idx as f64));
    }
}

#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
fn fill_uq15_inverse_gamma(igt: &[f32], out: &mut [u16]) {
    for (q, &v) in out.iter_mut().zip(igt) {
        *q = fix_to_uq15_one(v as f64);
    }
}

/// Byte-valued forward table indexed by a UQ15 linear value
///
/// `gt` must be a padded forward table of [`GAMMA_LENGTH`] entries.
pub fn make_uq15_gamma(gt: &[f32]) -> Arc<[u8]> {
    debug_assert!(gt.len() >= GAMMA_LENGTH);

    let mut gtq = vec![0u8; GAMMA_LENGTH_UQ15];
    fill_uq15_gamma(gt, &mut gtq);
    fixup(&mut gtq, GAMMA_SCALE_UQ15);
    gtq.into()
}

/// UQ15 inverse table; the canonical sRGB table is returned as-is
pub fn make_uq15_inverse_gamma(igt: &[f32]) -> Arc<[u16]> {
    if std::ptr::eq(igt, &**srgb_inverse_gamma()) {
        return Arc::clone(srgb_inverse_gamma_uq15());
    }

    let mut igtq = vec![0u16; INVERSE_GAMMA_LENGTH];
    fill_uq15_inverse_gamma(igt, &mut igtq);
    fixup(&mut igtq, INVERSE_GAMMA_SCALE);
    igtq.into()
}

/// Forward table whose output is compressed to video luma range
pub fn make_video_gamma(gt: &[f32]) -> Vec<f32> {
    let min = (VIDEO_LUMA_MIN << 2) as f64;
    let max = (VIDEO_LUMA_MAX << 2) as f64;

    let mut gtv: Vec<f32> = gt
        .iter()
        .map(|&v| ((v as f64 * (max - min) + min) / GAMMA_SCALE as f64) as f32)
        .collect();
    fixup(&mut gtv, GAMMA_SCALE);
    gtv
}

/// Inverse table whose input is video luma range
pub fn make_video_inverse_gamma(igt: &[f32]) -> Vec<f32> {
    let (min, max) = (VIDEO_LUMA_MIN, VIDEO_LUMA_MAX);

    let mut igtv: Vec<f32> = (0..igt.len())
        .map(|i| {
            let val = ((i as i32).clamp(min, max) - min) as f64 / (max - min) as f64;
            let pos = val * INVERSE_GAMMA_SCALE as f64;
            let idx = (pos as usize).min(igt.len().saturating_sub(2));
            lerp(igt[idx] as f64, igt[idx + 1] as f64, pos - idx as f64) as f32
        })
        .collect();
    fixup(&mut igtv, INVERSE_GAMMA_SCALE);
    igtv
}
