//! Kernel map invariants over random geometry

use oxscale_core::math::UQ15_ONE;
use oxscale_core::{InterpolationKind, KernelMap};
use oxscale_tests::seeded_rng;
use rand::Rng;

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

fn assert_well_formed(map: &KernelMap, context: &str) {
    assert_eq!(map.windows().len(), map.out_pixels(), "{context}");
    assert!(map.samples() >= 1 && map.samples() <= map.in_pixels(), "{context}");

    for (i, (start, weights)) in map.windows().enumerate() {
        assert_eq!(weights.len(), map.samples(), "{context} pixel {i}");
        assert!(start + weights.len() <= map.in_pixels(), "{context} pixel {i}");
        assert_eq!(
            weights.iter().sum::<i32>(),
            UQ15_ONE,
            "{context} pixel {i}: {weights:?}"
        );
    }
}

#[test]
fn test_scale_maps_conserve_weight() {
    let mut rng = seeded_rng(0xcafe);

    for _ in 0..40 {
        let in_pixels = rng.gen_range(1..10_000);
        let out_pixels = rng.gen_range(1..10_000);
        for kind in ALL {
            let map = KernelMap::make_scale_map(in_pixels, out_pixels, &kind.settings());
            assert_well_formed(&map, &format!("{kind} {in_pixels}->{out_pixels}"));
        }
    }
}

#[test]
fn test_tiny_inputs() {
    for in_pixels in 1..6 {
        for out_pixels in 1..12 {
            for kind in ALL {
                let map = KernelMap::make_scale_map(in_pixels, out_pixels, &kind.settings());
                assert_well_formed(&map, &format!("{kind} {in_pixels}->{out_pixels}"));
            }
        }
    }
}

#[test]
fn test_alpha_maps_conserve_weight() {
    let mut rng = seeded_rng(0xa1fa);

    for _ in 0..40 {
        let in_pixels = rng.gen_range(1..4_000);
        let out_pixels = rng.gen_range(1..4_000);
        for kind in [
            InterpolationKind::CatmullRom,
            InterpolationKind::Lanczos,
            InterpolationKind::Spline36,
        ] {
            let map = KernelMap::make_scale_map(in_pixels, out_pixels, &kind.settings());
            let alpha = map.make_alpha_map();
            assert_eq!(alpha.samples(), map.samples());
            assert_well_formed(&alpha, &format!("alpha {kind} {in_pixels}->{out_pixels}"));
            for i in 0..map.out_pixels() {
                assert_eq!(alpha.start(i), map.start(i));
            }
        }
    }
}

#[test]
fn test_blur_maps() {
    let mut rng = seeded_rng(0xb1);

    for _ in 0..100 {
        let size = rng.gen_range(1..2_000);
        let radius = rng.gen_range(0.3..3.0);
        let map = KernelMap::make_blur_map(size, radius);
        assert_eq!(map.out_pixels(), size);
        assert_well_formed(&map, &format!("blur {size} r={radius}"));

        let taps = map.samples();
        let dist = taps / 2;
        if size > taps {
            for i in dist..size - dist {
                assert_eq!(map.start(i), i - dist);
                let w = map.weights(i);
                assert!(w.iter().eq(w.iter().rev()), "blur {size} r={radius}: {w:?}");
            }
        }
    }
}

#[test]
fn test_nearest_neighbor_picks_centers() {
    let settings = InterpolationKind::NearestNeighbor.settings();

    let same = KernelMap::make_scale_map(7, 7, &settings);
    for (i, (start, weights)) in same.windows().enumerate() {
        assert_eq!(start, i);
        assert_eq!(weights, [UQ15_ONE]);
    }

    let half = KernelMap::make_scale_map(10, 5, &settings);
    let starts: Vec<usize> = (0..5).map(|i| half.start(i)).collect();
    assert_eq!(starts, [1, 3, 5, 7, 9]);
}

#[test]
fn test_upscale_windows_advance() {
    let map = KernelMap::make_scale_map(50, 400, &InterpolationKind::Lanczos.settings());
    assert_eq!(map.samples(), 6);
    let starts: Vec<usize> = (0..400).map(|i| map.start(i)).collect();
    assert!(starts.windows(2).all(|w| w[1] >= w[0]));
    assert_eq!(starts[0], 0);
    assert_eq!(*starts.last().unwrap(), 44);
}
