//! Fixed-point helpers
//!
//! Pixel math downstream of this crate runs in unsigned 15-bit fractional
//! fixed point (UQ15, one unit = 32768). ICC numbers are s15Fixed16.

/// Fractional bits of the pipeline's fixed-point format
pub const UQ15_SHIFT: u32 = 15;

/// One unit in UQ15
pub const UQ15_ONE: i32 = 1 << UQ15_SHIFT;

/// Divisor for s15Fixed16 numbers
pub const S15_FIXED16_ONE: f64 = 65536.0;

/// Video-range luma limits
pub const VIDEO_LUMA_MIN: i32 = 16;
pub const VIDEO_LUMA_MAX: i32 = 235;

/// Linear interpolation between `lo` and `hi`
#[inline]
pub fn lerp(lo: f64, hi: f64, t: f64) -> f64 {
    (hi - lo) * t + lo
}

/// Quantize to UQ15, round to nearest
#[inline]
pub fn fix15(x: f64) -> i32 {
    (x * UQ15_ONE as f64).round() as i32
}

/// Quantize a normalized value to UQ15, clamped to `[0, UQ15_ONE]`
#[inline]
pub fn fix_to_uq15_one(x: f64) -> u16 {
    ((x * UQ15_ONE as f64 + 0.5) as i32).clamp(0, UQ15_ONE) as u16
}

/// Quantize a normalized value to 8 bits, clamped to `[0, 255]`
#[inline]
pub fn fix_to_byte(x: f64) -> u8 {
    ((x * 255.0 + 0.5) as i32).clamp(0, 255) as u8
}

/// Convert s15Fixed16 to f64
#[inline]
pub fn s15_fixed16_to_f64(raw: i32) -> f64 {
    raw as f64 / S15_FIXED16_ONE
}

/// Convert f64 to s15Fixed16, round to nearest
#[inline]
pub fn f64_to_s15_fixed16(val: f64) -> i32 {
    (val * S15_FIXED16_ONE).round() as i32
}

/// Approximate equality used for matching well-known constants
pub trait RoughlyEqual {
    fn is_roughly_equal_to(&self, other: &Self) -> bool;
}

impl RoughlyEqual for f64 {
    #[inline]
    fn is_roughly_equal_to(&self, other: &Self) -> bool {
        (self - other).abs() < 1e-4
    }
}
