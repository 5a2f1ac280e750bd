//! Augmented inverse-probability weighting (doubly robust)

use serde::Serialize;

use crate::estimators::gformula::CounterfactualPredictions;
use crate::utils::{mean, sample_variance};

/// Two-sided 95% normal critical value
pub const Z_CRITICAL: f64 = 1.96;

/// AIPW point estimate with its influence-function variance and interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AipwEstimate {
    /// Mean of the pseudo-outcome
    pub estimate: f64,
    /// Sample variance of the centred pseudo-outcome divided by `n`
    pub variance: f64,
    /// `estimate - 1.96 * sqrt(variance)`
    pub lower: f64,
    /// `estimate + 1.96 * sqrt(variance)`
    pub upper: f64,
}

impl AipwEstimate {
    /// Whether `value` lies strictly inside the interval
    #[must_use]
    pub fn covers(&self, value: f64) -> bool {
        self.lower < value && value < self.upper
    }
}

/// Per-unit AIPW pseudo-outcomes `psi1 - psi0`
#[must_use]
pub fn pseudo_outcomes(
    outcome: &[f64],
    exposure: &[f64],
    propensity: &[f64],
    predictions: &CounterfactualPredictions,
) -> Vec<f64> {
    outcome
        .iter()
        .zip(exposure)
        .zip(propensity)
        .zip(predictions.treated.iter().zip(&predictions.control))
        .map(|(((&y, &x), &ps), (&y1, &y0))| {
            let psi1 = y * x / ps + y1 * (ps - x) / ps;
            let psi0 = y * (1.0 - x) / (1.0 - ps) + y0 * (x - ps) / (1.0 - ps);
            psi1 - psi0
        })
        .collect()
}

/// Doubly robust estimate from observed data, propensities and predictions
///
/// Needs at least two units for the variance.
#[must_use]
pub fn aipw(
    outcome: &[f64],
    exposure: &[f64],
    propensity: &[f64],
    predictions: &CounterfactualPredictions,
) -> AipwEstimate {
    let pseudo = pseudo_outcomes(outcome, exposure, propensity, predictions);
    let estimate = mean(&pseudo);
    let centred: Vec<f64> = pseudo.iter().map(|v| v - estimate).collect();
    let variance = sample_variance(&centred) / pseudo.len() as f64;
    let half_width = Z_CRITICAL * variance.sqrt();

    AipwEstimate {
        estimate,
        variance,
        lower: estimate - half_width,
        upper: estimate + half_width,
    }
}
