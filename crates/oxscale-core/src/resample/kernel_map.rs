//! Separable convolution kernel maps
//!
//! A map holds, for every output pixel, the first input pixel of its window
//! and `samples` UQ15 weights summing to exactly [`UQ15_ONE`]. Windows never
//! reach outside the input: weight that would fall off an edge is folded onto
//! the nearest in-range sample.

use std::borrow::Cow;

use tracing::{debug, trace};

use super::gaussian::GaussianFactory;
use super::interpolator::{InterpolationKind, InterpolationSettings, Interpolator};
use crate::math::{UQ15_ONE, fix15};

/// Blur applied to the alpha weighting function
const ALPHA_BLUR: f64 = 0.9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelMap {
    in_pixels: usize,
    out_pixels: usize,
    samples: usize,
    starts: Vec<usize>,
    weights: Vec<i32>,
}

/// Window geometry shared by the scale and alpha maps
#[derive(Debug, Clone, Copy)]
struct Window {
    factor: f64,
    dist: f64,
    size: usize,
}

impl Window {
    fn new(in_pixels: usize, out_pixels: usize, support: f64, blur: f64) -> Self {
        let factor = (out_pixels as f64 / in_pixels as f64).min(1.0);
        let dist = (support / factor * blur).min(in_pixels as f64 / 2.0);
        Self {
            factor,
            dist,
            size: ((dist * 2.0).ceil() as usize).max(1),
        }
    }
}

impl KernelMap {
    fn with_capacity(in_pixels: usize, out_pixels: usize, samples: usize) -> Self {
        Self {
            in_pixels,
            out_pixels,
            samples,
            starts: Vec::with_capacity(out_pixels),
            weights: Vec::with_capacity(out_pixels * samples),
        }
    }

    pub fn in_pixels(&self) -> usize {
        self.in_pixels
    }

    pub fn out_pixels(&self) -> usize {
        self.out_pixels
    }

    /// Weights per output pixel
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// First input pixel read for output pixel `i`
    pub fn start(&self, i: usize) -> usize {
        self.starts[i]
    }

    pub fn weights(&self, i: usize) -> &[i32] {
        &self.weights[i * self.samples..(i + 1) * self.samples]
    }

    /// `(start, weights)` for every output pixel
    pub fn windows(&self) -> impl ExactSizeIterator<Item = (usize, &[i32])> + '_ {
        self.starts
            .iter()
            .copied()
            .zip(self.weights.chunks_exact(self.samples))
    }

    /// Fold `kernel` into range and append it
    fn push(&mut self, start: isize, kernel: &[i32]) {
        let (start, folded) = clamp(start, self.in_pixels, kernel);
        self.starts.push(start);
        self.weights.extend_from_slice(&folded);
    }

    /// Kernel map resampling `in_pixels` to `out_pixels`
    pub fn make_scale_map(
        in_pixels: usize,
        out_pixels: usize,
        interpolator: &InterpolationSettings,
    ) -> Self {
        debug_assert!(in_pixels > 0 && out_pixels > 0);

        let weighting = interpolator.weighting();
        let support = weighting.support();
        let offset = if interpolator.is_point_sampler() { 0.5 } else { 0.0 };
        let blur = if support <= 0.5 { 1.0 } else { interpolator.blur() };
        let window = Window::new(in_pixels, out_pixels, support, blur);

        debug!(
            in_pixels,
            out_pixels,
            support,
            blur,
            samples = window.size,
            "building scale map"
        );

        let mut map = Self::with_capacity(in_pixels, out_pixels, window.size.min(in_pixels));
        let mut raw = vec![0.0; window.size];
        let mut kernel = vec![0; window.size];

        let inc = in_pixels as f64 / out_pixels as f64;
        let mut midpoint = (in_pixels as f64 - out_pixels as f64) / (out_pixels as f64 * 2.0) + offset;

        for _ in 0..out_pixels {
            let end = (midpoint + window.dist) as isize;
            let start = end - window.size as isize + 1;

            fill_weights(&mut raw, weighting, start, midpoint, window.factor / blur);
            quantize(&raw, &mut kernel);
            map.push(start, &kernel);

            midpoint += inc;
        }

        map
    }

    /// Same-size map applying a Gaussian blur of standard deviation `radius`
    pub fn make_blur_map(size: usize, radius: f64) -> Self {
        debug_assert!(size > 0 && radius > 0.0);

        let gauss = GaussianFactory::new(radius).make_kernel();
        let mut kernel = vec![0; gauss.len()];
        quantize(&gauss, &mut kernel);

        let dist = (gauss.len() / 2) as isize;
        debug!(size, radius, taps = gauss.len(), "building blur map");

        let mut map = Self::with_capacity(size, size, gauss.len().min(size));
        for i in 0..size as isize {
            map.push(i - dist, &kernel);
        }

        map
    }

    /// Weights for a premultiplied alpha channel
    ///
    /// A Hermite kernel evaluated over this map's windows keeps fully
    /// transparent pixels from spreading color into their neighbors. When
    /// the Hermite kernel would need windows at least as wide as this map's
    /// (so this map has no wide negative lobes), or no scaling takes place,
    /// this map is returned as is.
    pub fn make_alpha_map(&self) -> Cow<'_, Self> {
        if self.in_pixels == self.out_pixels {
            return Cow::Borrowed(self);
        }

        let hermite = InterpolationKind::Hermite.settings();
        let weighting = hermite.weighting();
        let window = Window::new(
            self.in_pixels,
            self.out_pixels,
            weighting.support(),
            ALPHA_BLUR,
        );
        if window.size >= self.samples {
            trace!(samples = self.samples, "alpha map reuses scale map");
            return Cow::Borrowed(self);
        }

        let mut map = Self::with_capacity(self.in_pixels, self.out_pixels, self.samples);
        let mut raw = vec![0.0; self.samples];
        let mut kernel = vec![0; self.samples];

        let inc = self.in_pixels as f64 / self.out_pixels as f64;
        let mut midpoint =
            (self.in_pixels as f64 - self.out_pixels as f64) / (self.out_pixels as f64 * 2.0);

        for (start, weights) in self.windows() {
            fill_weights(&mut raw, weighting, start as isize, midpoint, window.factor / ALPHA_BLUR);
            if raw.iter().all(|w| w.is_finite()) {
                quantize(&raw, &mut kernel);
                map.push(start as isize, &kernel);
            } else {
                map.push(start as isize, weights);
            }

            midpoint += inc;
        }

        debug!(samples = map.samples, "built alpha map");
        Cow::Owned(map)
    }
}

/// Evaluate `weighting` for samples `start..start + kernel.len()` around
/// `center` and normalize to a sum of 1
fn fill_weights(
    kernel: &mut [f64],
    weighting: &dyn Interpolator,
    start: isize,
    center: f64,
    scale: f64,
) {
    let mut sum = 0.0;
    for (j, w) in kernel.iter_mut().enumerate() {
        *w = weighting.weight(((start + j as isize) as f64 - center).abs() * scale);
        sum += *w;
    }

    let inv = 1.0 / sum;
    kernel.iter_mut().for_each(|w| *w *= inv);
}

/// Round each weight to UQ15 and give the rounding residual to the largest
/// weight so the window sums to exactly one unit
///
/// Output differs by up to a few units from plain per-weight rounding.
fn quantize(kernel: &[f64], out: &mut [i32]) {
    let mut sum = 0;
    let mut largest = 0;
    for (j, (&w, q)) in kernel.iter().zip(out.iter_mut()).enumerate() {
        *q = fix15(w);
        sum += *q;
        if kernel[j] > kernel[largest] {
            largest = j;
        }
    }

    out[largest] += UQ15_ONE - sum;
}

/// Move a window inside `[0, in_pixels)`
///
/// Weights of out-of-range samples are summed into the nearest in-range
/// sample. A window wider than the input shrinks to `in_pixels` samples.
fn clamp(start: isize, in_pixels: usize, kernel: &[i32]) -> (usize, Vec<i32>) {
    let samples = kernel.len().min(in_pixels);
    let hi = (in_pixels - samples) as isize;
    let clamped = start.clamp(0, hi);

    let mut folded = vec![0; samples];
    if clamped == start && samples == kernel.len() {
        folded.copy_from_slice(kernel);
        return (start as usize, folded);
    }

    let last = samples as isize - 1;
    for (j, &w) in kernel.iter().enumerate() {
        let pos = start + j as isize - clamped;
        folded[pos.clamp(0, last) as usize] += w;
    }

    (clamped as usize, folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(w: &[i32]) -> i32 {
        w.iter().sum()
    }

    #[test]
    fn test_box_downscale_pairs() {
        let map = KernelMap::make_scale_map(100, 50, &InterpolationKind::Average.settings());
        assert_eq!(map.samples(), 2);
        for (i, (start, w)) in map.windows().enumerate() {
            assert_eq!(start, i * 2);
            assert_eq!(w, &[UQ15_ONE / 2, UQ15_ONE / 2]);
        }
    }

    #[test]
    fn test_linear_downscale_pairs() {
        let map = KernelMap::make_scale_map(100, 50, &InterpolationKind::Linear.settings());
        assert_eq!(map.samples(), 4);

        // interior windows are centered between inputs 2i and 2i+1
        let eighth = UQ15_ONE / 8;
        assert_eq!(map.start(10), 19);
        assert_eq!(map.weights(10), &[eighth, 3 * eighth, 3 * eighth, eighth]);

        // the left edge folds input -1 onto input 0
        assert_eq!(map.start(0), 0);
        assert_eq!(map.weights(0), &[4 * eighth, 3 * eighth, eighth, 0]);

        // and the right edge folds input 100 onto input 99
        assert_eq!(map.start(49), 96);
        assert_eq!(map.weights(49), &[0, eighth, 3 * eighth, 4 * eighth]);
    }

    #[test]
    fn test_identity_scale() {
        let map = KernelMap::make_scale_map(10, 10, &InterpolationKind::NearestNeighbor.settings());
        assert_eq!(map.samples(), 1);
        for (i, (start, w)) in map.windows().enumerate() {
            assert_eq!(start, i);
            assert_eq!(w, &[UQ15_ONE]);
        }
    }

    #[test]
    fn test_weights_sum_to_one_unit() {
        for kind in [
            InterpolationKind::Linear,
            InterpolationKind::CatmullRom,
            InterpolationKind::Lanczos,
            InterpolationKind::Spline36,
            InterpolationKind::CubicSmoother,
        ] {
            let settings = kind.settings();
            for (i, o) in [(7, 3), (3, 7), (1, 5), (5, 1), (640, 480), (13, 13)] {
                let map = KernelMap::make_scale_map(i, o, &settings);
                assert_eq!(map.windows().len(), o);
                for (start, w) in map.windows() {
                    assert_eq!(total(w), UQ15_ONE, "{kind} {i}->{o}");
                    assert!(start + w.len() <= i);
                }
            }
        }
    }

    #[test]
    fn test_blur_map_symmetric() {
        let map = KernelMap::make_blur_map(32, 1.0);
        assert_eq!(map.samples(), 7);
        assert_eq!(map.start(16), 13);

        let w = map.weights(16);
        assert_eq!(total(w), UQ15_ONE);
        for j in 0..3 {
            assert_eq!(w[j], w[6 - j]);
        }

        assert_eq!(map.start(0), 0);
        assert_eq!(total(map.weights(0)), UQ15_ONE);
        assert_eq!(map.start(31), 25);
    }

    #[test]
    fn test_blur_map_wider_than_input() {
        let map = KernelMap::make_blur_map(3, 1.5);
        assert_eq!(map.samples(), 3);
        for (start, w) in map.windows() {
            assert_eq!(start, 0);
            assert_eq!(total(w), UQ15_ONE);
        }
    }

    #[test]
    fn test_clamp_folds_to_nearest() {
        assert_eq!(clamp(-2, 10, &[1, 2, 3, 4]), (0, vec![6, 4, 0, 0]));
        assert_eq!(clamp(8, 10, &[1, 2, 3, 4]), (6, vec![0, 0, 1, 9]));
        assert_eq!(clamp(3, 10, &[1, 2, 3, 4]), (3, vec![1, 2, 3, 4]));
        assert_eq!(clamp(-1, 2, &[1, 2, 3, 4]), (0, vec![3, 7]));
    }

    #[test]
    fn test_quantize_residual() {
        let mut out = [0; 3];
        quantize(&[1.0 / 3.0, 1.0 / 3.0 + 1e-9, 1.0 / 3.0], &mut out);
        assert_eq!(total(&out), UQ15_ONE);
        assert_eq!(out, [10923, 10922, 10923]);
    }

    #[test]
    fn test_alpha_map() {
        let catmull = InterpolationKind::CatmullRom.settings();
        let map = KernelMap::make_scale_map(100, 30, &catmull);
        let alpha = map.make_alpha_map();
        assert!(matches!(alpha, Cow::Owned(_)));
        assert_eq!(alpha.samples(), map.samples());
        for (i, (start, w)) in alpha.windows().enumerate() {
            assert_eq!(start, map.start(i));
            assert_eq!(total(w), UQ15_ONE);
        }

        let same = KernelMap::make_scale_map(30, 30, &catmull);
        assert!(matches!(same.make_alpha_map(), Cow::Borrowed(_)));

        let average = KernelMap::make_scale_map(100, 30, &InterpolationKind::Average.settings());
        assert!(matches!(average.make_alpha_map(), Cow::Borrowed(_)));
    }
}
