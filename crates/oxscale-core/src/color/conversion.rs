//! Conversion matrix builders
//!
//! References:
//! - SMPTE RP 177-1993 (primaries + white → RGB→XYZ)
//! - ICC.1:2010 Annex E (Bradford chromatic adaptation)

use crate::math::{Matrix3x3, Vector3};

/// ICC PCS illuminant (D50), as encoded in every ICC header
pub const ICC_D50: Vector3 = Vector3::new(0xf6d6 as f64 / 65536.0, 1.0, 0xd32d as f64 / 65536.0);

/// Bradford matrix: XYZ → cone response
pub const BRADFORD: Matrix3x3 = Matrix3x3::new(
    0.8951, 0.2664, -0.1614, //
    -0.7502, 1.7135, 0.0367, //
    0.0389, -0.0685, 1.0296,
);

/// RGB→XYZ matrix from primary and white point XYZ values
///
/// Columns of the result are the primaries scaled so that RGB (1, 1, 1)
/// maps to `w`. Degenerate primaries yield the zero matrix.
pub fn rgb_to_xyz(r: Vector3, g: Vector3, b: Vector3, w: Vector3) -> Matrix3x3 {
    let m = Matrix3x3::from_columns(r, g, b);
    let im = m.invert().unwrap_or(Matrix3x3::ZERO);

    Matrix3x3::from_columns(
        r * im.row(0).dot(&w),
        g * im.row(1).dot(&w),
        b * im.row(2).dot(&w),
    )
}

/// Bradford adaptation from `src_white` to [`ICC_D50`]
///
/// Returns `Bradford⁻¹ · diag(lms(D50) / lms(src)) · Bradford`.
pub fn chromatic_adaptation(src_white: Vector3) -> Matrix3x3 {
    let src = BRADFORD * src_white;
    let dst = BRADFORD * ICC_D50;
    let ratio = dst / src;

    let scale = Matrix3x3::diagonal(ratio.x(), ratio.y(), ratio.z());
    let inverse = BRADFORD.invert().unwrap_or(Matrix3x3::IDENTITY);

    inverse * scale * BRADFORD
}
