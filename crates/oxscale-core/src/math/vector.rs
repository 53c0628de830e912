//! Three-component double precision vector
//!
//! Storage is four lanes wide so a vector (and each matrix row) fills one
//! 256-bit register. The fourth lane is always zero and never participates
//! in comparisons or dot products.

use std::ops::{Add, Div, Index, Mul, Sub};

/// A 3-component vector, typically an XYZ or RGB triple
#[derive(Debug, Clone, Copy, Default)]
#[repr(C, align(32))]
pub struct Vector3 {
    v: [f64; 4],
}

impl Vector3 {
    /// The zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a vector from three components
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { v: [x, y, z, 0.0] }
    }

    /// Create a vector with all three components set to `s`
    #[inline]
    pub const fn splat(s: f64) -> Self {
        Self::new(s, s, s)
    }

    #[inline]
    pub const fn x(&self) -> f64 {
        self.v[0]
    }

    #[inline]
    pub const fn y(&self) -> f64 {
        self.v[1]
    }

    #[inline]
    pub const fn z(&self) -> f64 {
        self.v[2]
    }

    /// The three meaningful components
    #[inline]
    pub const fn to_array(&self) -> [f64; 3] {
        [self.v[0], self.v[1], self.v[2]]
    }

    /// Dot product
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.v[0] * other.v[0] + self.v[1] * other.v[1] + self.v[2] * other.v[2]
    }

    /// True when every component is exactly zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    #[inline]
    fn zip(self, rhs: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self::new(f(self.v[0], rhs.v[0]), f(self.v[1], rhs.v[1]), f(self.v[2], rhs.v[2]))
    }
}

impl PartialEq for Vector3 {
    fn eq(&self, other: &Self) -> bool {
        self.v[..3] == other.v[..3]
    }
}

impl Index<usize> for Vector3 {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.v[..3][i]
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }
}

impl Mul for Vector3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a * b)
    }
}

impl Div for Vector3 {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a / b)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self * Self::splat(rhs)
    }
}
