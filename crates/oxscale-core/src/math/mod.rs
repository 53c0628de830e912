//! Mathematical primitives
//!
//! - Padded 3-vectors and 3x3 matrices for RGB↔XYZ transforms
//! - Fixed-point quantization helpers shared by lookup tables and kernel maps

pub mod fixed;
pub mod matrix;
pub mod vector;

pub use fixed::{RoughlyEqual, UQ15_ONE, fix_to_byte, fix_to_uq15_one, fix15, lerp};
pub use matrix::Matrix3x3;
pub use vector::Vector3;
