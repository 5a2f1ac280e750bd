//! Gaussian kernel density estimation with Scott's bandwidth rule

use std::f64::consts::PI;

use crate::error::{Result, SimulationError};
use crate::utils::{linspace, sample_std_dev};

/// Grid size used for bias density curves
pub const DEFAULT_GRID_POINTS: usize = 100;

/// Univariate Gaussian KDE
#[derive(Debug, Clone)]
pub struct GaussianKde {
    sample: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Fit to a sample of at least two distinct finite values
    ///
    /// The bandwidth is `sd * n^(-1/5)` with the `n - 1` standard deviation.
    pub fn new(sample: &[f64]) -> Result<Self> {
        if sample.len() < 2 {
            return Err(SimulationError::validation(format!(
                "Density estimation needs at least 2 values, got {}",
                sample.len()
            )));
        }
        if sample.iter().any(|v| !v.is_finite()) {
            return Err(SimulationError::validation(
                "Density estimation sample contains non-finite values",
            ));
        }
        let sd = sample_std_dev(sample);
        if sd <= 0.0 {
            return Err(SimulationError::validation(
                "Density estimation sample has zero variance",
            ));
        }
        let bandwidth = sd * (sample.len() as f64).powf(-0.2);

        Ok(Self {
            sample: sample.to_vec(),
            bandwidth,
        })
    }

    /// Kernel standard deviation
    #[must_use]
    pub const fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Density at a single point
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let norm = 1.0 / (self.sample.len() as f64 * h * (2.0 * PI).sqrt());
        norm * self
            .sample
            .iter()
            .map(|&xi| {
                let u = (x - xi) / h;
                (-0.5 * u * u).exp()
            })
            .sum::<f64>()
    }

    /// Density at every point of `grid`
    #[must_use]
    pub fn evaluate_many(&self, grid: &[f64]) -> Vec<f64> {
        grid.iter().map(|&x| self.evaluate(x)).collect()
    }

    /// Evenly spaced grid from the sample minimum to its maximum and the
    /// density on it
    #[must_use]
    pub fn curve(&self, points: usize) -> (Vec<f64>, Vec<f64>) {
        let (lo, hi) = self
            .sample
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let grid = linspace(lo, hi, points);
        let density = self.evaluate_many(&grid);
        (grid, density)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::StandardNormal;

    #[test]
    fn test_scott_bandwidth() {
        let sample = [1.0, 2.0, 3.0, 4.0];
        let kde = GaussianKde::new(&sample).unwrap();
        let sd = (5.0f64 / 3.0).sqrt();
        assert!((kde.bandwidth() - sd * 4f64.powf(-0.2)).abs() < 1e-12);
    }

    #[test]
    fn test_standard_normal_peak() {
        let mut rng = StdRng::seed_from_u64(8);
        let sample: Vec<f64> = (0..5000).map(|_| rng.sample(StandardNormal)).collect();
        let kde = GaussianKde::new(&sample).unwrap();
        let peak = 1.0 / (2.0 * PI).sqrt();
        assert!((kde.evaluate(0.0) - peak).abs() < 0.03);
        assert!(kde.evaluate(4.0) < 0.01);
    }

    #[test]
    fn test_curve_spans_sample() {
        let sample = [-1.0, 0.5, 2.0];
        let (grid, density) = GaussianKde::new(&sample).unwrap().curve(DEFAULT_GRID_POINTS);
        assert_eq!(grid.len(), 100);
        assert_eq!(density.len(), 100);
        assert_eq!(grid[0], -1.0);
        assert_eq!(grid[99], 2.0);
        assert!(density.iter().all(|&d| d > 0.0));
    }

    #[test]
    fn test_degenerate_samples_rejected() {
        assert!(GaussianKde::new(&[1.0]).is_err());
        assert!(GaussianKde::new(&[2.0, 2.0, 2.0]).is_err());
        assert!(GaussianKde::new(&[1.0, f64::NAN]).is_err());
    }
}
