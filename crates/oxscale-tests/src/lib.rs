//! # oxscale-tests
//!
//! Integration and cross-CMS parity tests for oxscale.
//!
//! This crate provides:
//! - A synthetic ICC profile builder for malformed and edge-case inputs
//! - Seeded random generators for matrices and image sizes
//! - Thin wrappers around reference implementations
//!
//! ## Reference Implementations
//!
//! - **lcms2**: Industry standard, full ICC support
//! - **moxcms**: Pure Rust CMS
//! - **qcms**: Firefox's CMS (pure Rust)
//! - **palette**: Reference sRGB transfer function

pub mod fixtures;
pub mod reference;

pub use fixtures::{IccBuilder, random_invertible_matrix, seeded_rng};
