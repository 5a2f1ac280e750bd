//! Logistic regression by iteratively reweighted least squares

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::models::design::DesignMatrix;
use crate::models::ols::solve_normal_equations;
use crate::utils::expit;

/// Lower bound on the IRLS working weights `mu * (1 - mu)`
const MIN_WEIGHT: f64 = 1e-10;

/// Clamp for fitted probabilities inside the deviance
const PROB_EPS: f64 = 1e-15;

/// Iteration controls for [`fit_logistic`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrlsConfig {
    /// Maximum number of reweighting steps
    pub max_iterations: usize,
    /// Relative deviance change that counts as converged
    pub tolerance: f64,
}

impl Default for IrlsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-8,
        }
    }
}

/// Coefficients and diagnostics of a converged logistic fit
#[derive(Debug, Clone)]
pub struct IrlsResult {
    /// Intercept first, then predictors in specification order
    pub coefficients: Vec<f64>,
    /// Number of reweighting steps taken
    pub iterations: usize,
    /// Binomial deviance at the solution
    pub deviance: f64,
}

fn binomial_deviance(y: &[f64], mu: &[f64]) -> f64 {
    -2.0 * y
        .iter()
        .zip(mu)
        .map(|(&yi, &mi)| {
            let m = mi.clamp(PROB_EPS, 1.0 - PROB_EPS);
            yi * m.ln() + (1.0 - yi) * (1.0 - m).ln()
        })
        .sum::<f64>()
}

/// Maximum-likelihood logistic regression of a 0/1 response on `design`
///
/// Starts from `mu = (y + 0.5) / 2` and stops when
/// `|dev - dev_old| / (|dev| + 0.1)` drops below the tolerance.
pub fn fit_logistic(design: &DesignMatrix, y: &[f64], config: &IrlsConfig) -> Result<IrlsResult> {
    let n = design.rows();
    let p = design.cols();
    if y.len() != n {
        return Err(SimulationError::validation(format!(
            "Response has {} rows, design matrix has {n}",
            y.len()
        )));
    }
    if y.iter().any(|&v| v != 0.0 && v != 1.0) {
        return Err(SimulationError::validation(
            "Logistic response must contain only 0/1 values",
        ));
    }

    let mut mu: Vec<f64> = y.iter().map(|&v| (v + 0.5) / 2.0).collect();
    let mut eta: Vec<f64> = mu.iter().map(|&m| (m / (1.0 - m)).ln()).collect();
    let mut deviance_old = binomial_deviance(y, &mu);
    let mut beta = vec![0.0; p];
    let mut change = f64::INFINITY;

    let mut weights = vec![0.0; n];
    let mut working = vec![0.0; n];

    for iteration in 1..=config.max_iterations {
        for i in 0..n {
            let var = (mu[i] * (1.0 - mu[i])).max(MIN_WEIGHT);
            weights[i] = var;
            working[i] = eta[i] + (y[i] - mu[i]) / var;
        }

        let (xtwx, xtwz) = design.cross_products(Some(&weights), &working);
        beta = solve_normal_equations(&xtwx, xtwz, p)?;

        eta = design.linear_predictor(&beta);
        for (m, &e) in mu.iter_mut().zip(&eta) {
            *m = expit(e);
        }

        let deviance = binomial_deviance(y, &mu);
        change = (deviance - deviance_old).abs() / (deviance.abs() + 0.1);
        debug!("IRLS iteration {iteration}: deviance {deviance:.6}, relative change {change:.3e}");

        if change < config.tolerance {
            return Ok(IrlsResult {
                coefficients: beta,
                iterations: iteration,
                deviance,
            });
        }
        deviance_old = deviance;
    }

    debug!("IRLS stopped without converging, last coefficients {beta:?}");
    Err(SimulationError::NonConvergence {
        iterations: config.max_iterations,
        change,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Replicate;
    use crate::models::spec::ModelSpec;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::StandardNormal;

    fn simulated(n: usize, b0: f64, b1: f64, seed: u64) -> Replicate {
        let mut rng = StdRng::seed_from_u64(seed);
        let z1: Vec<f64> = (0..n).map(|_| rng.sample(StandardNormal)).collect();
        let x: Vec<f64> = z1
            .iter()
            .map(|&z| f64::from(u8::from(rng.random_bool(expit(b0 + b1 * z)))))
            .collect();
        Replicate::from_columns(0, z1, vec![0.0; n], vec![0.0; n], x, vec![0.0; n]).unwrap()
    }

    #[test]
    fn test_recovers_coefficients() {
        let table = simulated(20_000, -0.5, 1.2, 11);
        let spec = ModelSpec::logistic("X", &["Z1"]);
        let design = DesignMatrix::build(&spec, &table, &[]).unwrap();

        let fit = fit_logistic(&design, table.exposure(), &IrlsConfig::default()).unwrap();
        assert!((fit.coefficients[0] + 0.5).abs() < 0.08, "{:?}", fit.coefficients);
        assert!((fit.coefficients[1] - 1.2).abs() < 0.08, "{:?}", fit.coefficients);
        assert!(fit.iterations < 30);
        assert!(fit.deviance > 0.0);
    }

    #[test]
    fn test_intercept_only_matches_log_odds() {
        // 3 of 10 exposed
        let x = vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let table =
            Replicate::from_columns(0, vec![0.0; 10], vec![0.0; 10], vec![0.0; 10], x, vec![0.0; 10])
                .unwrap();
        let spec = ModelSpec::logistic("X", &[]);
        let design = DesignMatrix::build(&spec, &table, &[]).unwrap();

        let fit = fit_logistic(&design, table.exposure(), &IrlsConfig::default()).unwrap();
        assert!((fit.coefficients[0] - (0.3f64 / 0.7).ln()).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_non_binary_response() {
        let table = simulated(10, 0.0, 1.0, 1);
        let spec = ModelSpec::logistic("Z1", &[]);
        let design = DesignMatrix::build(&spec, &table, &[]).unwrap();
        let z1 = crate::data::DataTable::column(&table, "Z1").unwrap().to_vec();
        assert!(fit_logistic(&design, &z1, &IrlsConfig::default()).is_err());
    }

    #[test]
    fn test_iteration_cap_reports_non_convergence() {
        let table = simulated(500, 0.0, 1.0, 5);
        let spec = ModelSpec::logistic("X", &["Z1"]);
        let design = DesignMatrix::build(&spec, &table, &[]).unwrap();
        let config = IrlsConfig {
            max_iterations: 1,
            tolerance: 1e-12,
        };
        assert!(matches!(
            fit_logistic(&design, table.exposure(), &config),
            Err(SimulationError::NonConvergence { iterations: 1, .. })
        ));
    }
}
