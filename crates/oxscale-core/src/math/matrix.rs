//! 3x3 Matrix operations for color space transforms
//!
//! Used for RGB→XYZ conversion and chromatic adaptation. Rows are stored as
//! padded [`Vector3`] values so each row occupies a full 256-bit lane.

use std::ops::{Index, Mul};

use super::vector::Vector3;

/// Tolerance for [`Matrix3x3::is_roughly_equal_to`]
pub const MATRIX_EPSILON: f64 = 1e-3;

/// A 3x3 matrix, row-major
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C, align(32))]
pub struct Matrix3x3 {
    rows: [Vector3; 3],
}

impl Matrix3x3 {
    /// The all-zero matrix
    pub const ZERO: Self = Self::from_rows(Vector3::ZERO, Vector3::ZERO, Vector3::ZERO);

    /// The identity matrix
    pub const IDENTITY: Self = Self::diagonal(1.0, 1.0, 1.0);

    /// Create a matrix from nine row-major elements
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub const fn new(
        m11: f64,
        m12: f64,
        m13: f64,
        m21: f64,
        m22: f64,
        m23: f64,
        m31: f64,
        m32: f64,
        m33: f64,
    ) -> Self {
        Self::from_rows(
            Vector3::new(m11, m12, m13),
            Vector3::new(m21, m22, m23),
            Vector3::new(m31, m32, m33),
        )
    }

    #[inline]
    pub const fn from_rows(r1: Vector3, r2: Vector3, r3: Vector3) -> Self {
        Self { rows: [r1, r2, r3] }
    }

    #[inline]
    pub const fn from_columns(c1: Vector3, c2: Vector3, c3: Vector3) -> Self {
        Self::new(
            c1.x(),
            c2.x(),
            c3.x(),
            c1.y(),
            c2.y(),
            c3.y(),
            c1.z(),
            c2.z(),
            c3.z(),
        )
    }

    /// Create a diagonal matrix from three values
    #[inline]
    pub const fn diagonal(d1: f64, d2: f64, d3: f64) -> Self {
        Self::new(d1, 0.0, 0.0, 0.0, d2, 0.0, 0.0, 0.0, d3)
    }

    /// Row `i` (0-based)
    #[inline]
    pub const fn row(&self, i: usize) -> Vector3 {
        self.rows[i]
    }

    /// Column `i` (0-based)
    #[inline]
    pub const fn column(&self, i: usize) -> Vector3 {
        Vector3::new(
            self.rows[0].to_array()[i],
            self.rows[1].to_array()[i],
            self.rows[2].to_array()[i],
        )
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_columns(self.rows[0], self.rows[1], self.rows[2])
    }

    pub fn determinant(&self) -> f64 {
        let [a, b, c] = self.rows.map(|r| r.to_array());
        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    /// Inverse of this matrix
    ///
    /// Returns `None` when `|det|` is below machine epsilon.
    pub fn invert(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < f64::EPSILON {
            return None;
        }

        let [a, b, c] = self.rows.map(|r| r.to_array());
        let adjugate = Self::new(
            b[1] * c[2] - b[2] * c[1],
            a[2] * c[1] - a[1] * c[2],
            a[1] * b[2] - a[2] * b[1],
            b[2] * c[0] - b[0] * c[2],
            a[0] * c[2] - a[2] * c[0],
            a[2] * b[0] - a[0] * b[2],
            b[0] * c[1] - b[1] * c[0],
            a[1] * c[0] - a[0] * c[1],
            a[0] * b[1] - a[1] * b[0],
        );

        Some(adjugate * (1.0 / det))
    }

    /// Element-wise comparison within [`MATRIX_EPSILON`]
    pub fn is_roughly_equal_to(&self, other: &Self) -> bool {
        self.rows.iter().zip(other.rows.iter()).all(|(a, b)| {
            let d = *a - *b;
            d.to_array().iter().all(|v| v.abs() < MATRIX_EPSILON)
        })
    }
}

impl Index<(usize, usize)> for Matrix3x3 {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.rows[row][col]
    }
}

impl Mul for Matrix3x3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let cols = [rhs.column(0), rhs.column(1), rhs.column(2)];
        let row = |r: &Vector3| Vector3::new(r.dot(&cols[0]), r.dot(&cols[1]), r.dot(&cols[2]));
        Self::from_rows(row(&self.rows[0]), row(&self.rows[1]), row(&self.rows[2]))
    }
}

impl Mul<f64> for Matrix3x3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self {
            rows: self.rows.map(|r| r * rhs),
        }
    }
}

impl Mul<Vector3> for Matrix3x3 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Vector3 {
        Vector3::new(
            self.rows[0].dot(&rhs),
            self.rows[1].dot(&rhs),
            self.rows[2].dot(&rhs),
        )
    }
}
