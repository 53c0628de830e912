//! Gaussian kernel factory

use std::f64::consts::PI;

/// Normal distribution with mean 0 and the given standard deviation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianFactory {
    sigma: f64,
    scale: f64,
}

impl GaussianFactory {
    pub fn new(sigma: f64) -> Self {
        Self {
            sigma,
            scale: 1.0 / (2.0 * PI * sigma * sigma).sqrt(),
        }
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Three standard deviations
    pub fn support(&self) -> f64 {
        self.sigma * 3.0
    }

    pub fn value(&self, d: f64) -> f64 {
        self.scale * (-(d * d) / (2.0 * self.sigma * self.sigma)).exp()
    }

    /// Sampled kernel of length `2 * ceil(3σ) + 1`, normalized to sum to 1
    pub fn make_kernel(&self) -> Vec<f64> {
        let dist = self.support().ceil() as i64;
        let mut kernel: Vec<f64> = (-dist..=dist).map(|i| self.value(i as f64)).collect();

        let sum: f64 = kernel.iter().sum();
        kernel.iter_mut().for_each(|v| *v /= sum);
        kernel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_length() {
        assert_eq!(GaussianFactory::new(1.0).make_kernel().len(), 7);
        assert_eq!(GaussianFactory::new(0.5).make_kernel().len(), 5);
        assert_eq!(GaussianFactory::new(1.5).make_kernel().len(), 11);
    }

    #[test]
    fn test_kernel_normalized_and_symmetric() {
        let k = GaussianFactory::new(0.75).make_kernel();
        let sum: f64 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);

        let n = k.len();
        for i in 0..n / 2 {
            assert_eq!(k[i], k[n - 1 - i]);
        }
        assert!(k[n / 2] > k[n / 2 - 1]);
    }

    #[test]
    fn test_value_is_density() {
        let g = GaussianFactory::new(1.0);
        assert!((g.value(0.0) - 0.3989422804014327).abs() < 1e-12);
    }
}
