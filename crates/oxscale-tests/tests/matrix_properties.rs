//! Matrix algebra and color-matrix construction properties

use oxscale_core::Matrix3x3;
use oxscale_core::Vector3;
use oxscale_core::color::{ICC_D50, chromatic_adaptation, rgb_to_xyz};
use oxscale_core::icc::builtin::{D65, DISPLAY_P3_COLORANTS, SRGB_COLORANTS};
use oxscale_tests::{random_invertible_matrix, seeded_rng};

fn xy(x: f64, y: f64) -> Vector3 {
    Vector3::new(x / y, 1.0, (1.0 - x - y) / y)
}

fn assert_vector_close(a: Vector3, b: Vector3, eps: f64) {
    for i in 0..3 {
        assert!((a[i] - b[i]).abs() < eps, "{a:?} != {b:?}");
    }
}

#[test]
fn test_inverse_round_trip_random() {
    let mut rng = seeded_rng(0x5eed);
    for _ in 0..1000 {
        let m = random_invertible_matrix(&mut rng);
        let inv = m.invert().expect("determinant was bounded away from zero");
        assert!((m * inv).is_roughly_equal_to(&Matrix3x3::IDENTITY));
        assert!((inv * m).is_roughly_equal_to(&Matrix3x3::IDENTITY));
        assert!(inv.invert().unwrap().is_roughly_equal_to(&m));
    }
}

#[test]
fn test_singular_matrices() {
    let dependent = Matrix3x3::from_columns(
        Vector3::new(1.0, 2.0, 3.0),
        Vector3::new(2.0, 4.0, 6.0),
        Vector3::new(0.0, 1.0, 0.0),
    );
    assert!(dependent.invert().is_none());
    assert!(Matrix3x3::ZERO.invert().is_none());
}

#[test]
fn test_column_form() {
    let m = Matrix3x3::from_columns(
        Vector3::new(1.0, 2.0, 3.0),
        Vector3::new(4.0, 5.0, 6.0),
        Vector3::new(7.0, 8.0, 9.0),
    );
    assert_eq!(m[(0, 1)], 4.0);
    assert_eq!(m.column(2), Vector3::new(7.0, 8.0, 9.0));
    assert_eq!(m.row(0), Vector3::new(1.0, 4.0, 7.0));
    assert_eq!(m.transpose().row(1), Vector3::new(4.0, 5.0, 6.0));
}

#[test]
fn test_adaptation_to_d50() {
    assert!(chromatic_adaptation(ICC_D50).is_roughly_equal_to(&Matrix3x3::IDENTITY));
    assert_vector_close(chromatic_adaptation(D65) * D65, ICC_D50, 1e-9);
}

#[test]
fn test_rgb_to_xyz_maps_white() {
    let m = rgb_to_xyz(xy(0.64, 0.33), xy(0.30, 0.60), xy(0.15, 0.06), D65);
    assert_vector_close(m * Vector3::splat(1.0), D65, 1e-9);
    // luminance row sums to Y of white
    assert!((m.row(1).dot(&Vector3::splat(1.0)) - 1.0).abs() < 1e-9);
}

#[test]
fn test_adapted_colorants_match_canonical() {
    let adapt = chromatic_adaptation(D65);

    let srgb = adapt * rgb_to_xyz(xy(0.64, 0.33), xy(0.30, 0.60), xy(0.15, 0.06), D65);
    assert!(srgb.is_roughly_equal_to(&SRGB_COLORANTS));

    let p3 = adapt * rgb_to_xyz(xy(0.680, 0.320), xy(0.265, 0.690), xy(0.150, 0.060), D65);
    assert!(p3.is_roughly_equal_to(&DISPLAY_P3_COLORANTS));
}

#[test]
fn test_degenerate_primaries_give_zero() {
    let p = xy(0.3, 0.6);
    assert_eq!(rgb_to_xyz(p, p, p, D65), Matrix3x3::ZERO);
}
