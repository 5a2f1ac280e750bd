//! Data-generating model and the unit record it produces

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::utils::expit;

/// Average treatment effect built into the generative model.
///
/// Exposure never enters the outcome equation, so every estimator's bias is
/// its estimate minus zero.
pub const TRUE_EFFECT: f64 = 0.0;

/// Column names shared by the generator, the models and the Parquet schema
pub mod columns {
    /// Replicate identifier
    pub const SIM_ID: &str = "sim_id";
    /// First continuous confounder
    pub const Z1: &str = "Z1";
    /// Continuous covariate affecting exposure only
    pub const Z2: &str = "Z2";
    /// Binary confounder
    pub const Z3: &str = "Z3";
    /// Binary exposure
    pub const X: &str = "X";
    /// Outcome
    pub const Y: &str = "Y";
}

/// How the exposure is derived from the propensity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExposureAssignment {
    /// `X ~ Bernoulli(p)`
    Bernoulli,
    /// `X = 1` when `p` is below the cut-off, otherwise `X = 0`
    Threshold(f64),
}

/// Distribution of the outcome given covariates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutcomeKind {
    /// Linear predictor plus Gaussian noise with the given standard deviation
    Continuous {
        /// Standard deviation of the additive noise
        noise_sd: f64,
    },
    /// `Y ~ Bernoulli(expit(linear predictor))`
    Binary,
}

/// Coefficients of the exposure and outcome equations
///
/// Exposure: `p = expit(b0 + b1*Z1 + b2*Z2 + b3*Z3)`.
/// Outcome: `Y = c0 + c1*Z1 + c3*Z3 (+ noise)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerativeModel {
    /// `P(Z3 = 1)`
    pub z3_probability: f64,
    /// Exposure intercept
    pub exposure_intercept: f64,
    /// Exposure coefficient on Z1
    pub exposure_z1: f64,
    /// Exposure coefficient on Z2
    pub exposure_z2: f64,
    /// Exposure coefficient on Z3
    pub exposure_z3: f64,
    /// Propensity-to-exposure mapping
    pub exposure_assignment: ExposureAssignment,
    /// Outcome intercept
    pub outcome_intercept: f64,
    /// Outcome coefficient on Z1
    pub outcome_z1: f64,
    /// Outcome coefficient on Z3
    pub outcome_z3: f64,
    /// Outcome distribution
    pub outcome: OutcomeKind,
}

impl Default for GenerativeModel {
    fn default() -> Self {
        Self {
            z3_probability: 0.3,
            exposure_intercept: 1.5,
            exposure_z1: 1.0,
            exposure_z2: -2.0,
            exposure_z3: 1.0,
            exposure_assignment: ExposureAssignment::Bernoulli,
            outcome_intercept: 0.0,
            outcome_z1: 1.0,
            outcome_z3: 1.0,
            outcome: OutcomeKind::Continuous { noise_sd: 2.0 },
        }
    }
}

impl GenerativeModel {
    /// Use a binary outcome instead of the continuous one
    #[must_use]
    pub fn with_binary_outcome(mut self) -> Self {
        self.outcome = OutcomeKind::Binary;
        self
    }

    /// Use a deterministic propensity cut-off for exposure
    #[must_use]
    pub fn with_threshold_exposure(mut self, cutoff: f64) -> Self {
        self.exposure_assignment = ExposureAssignment::Threshold(cutoff);
        self
    }

    /// Propensity of exposure for one unit
    #[inline]
    #[must_use]
    pub fn propensity(&self, z1: f64, z2: f64, z3: f64) -> f64 {
        expit(
            self.exposure_intercept
                + self.exposure_z1 * z1
                + self.exposure_z2 * z2
                + self.exposure_z3 * z3,
        )
    }

    /// Outcome linear predictor for one unit
    #[inline]
    #[must_use]
    pub fn outcome_mean(&self, z1: f64, z3: f64) -> f64 {
        self.outcome_intercept + self.outcome_z1 * z1 + self.outcome_z3 * z3
    }

    /// Check that probabilities and scales are usable
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.z3_probability) {
            return Err(SimulationError::validation(format!(
                "Z3 probability must lie in [0, 1], got {}",
                self.z3_probability
            )));
        }
        if let ExposureAssignment::Threshold(cutoff) = self.exposure_assignment {
            if !(cutoff > 0.0 && cutoff < 1.0) {
                return Err(SimulationError::validation(format!(
                    "Exposure threshold must lie in (0, 1), got {cutoff}"
                )));
            }
        }
        if let OutcomeKind::Continuous { noise_sd } = self.outcome {
            if !noise_sd.is_finite() || noise_sd < 0.0 {
                return Err(SimulationError::validation(format!(
                    "Outcome noise standard deviation must be finite and >= 0, got {noise_sd}"
                )));
            }
        }
        Ok(())
    }
}

/// One synthetic unit as stored in the flat file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Replicate the unit belongs to
    #[serde(rename = "sim_id")]
    pub replicate_id: u32,
    /// Continuous confounder
    #[serde(rename = "Z1")]
    pub z1: f64,
    /// Continuous exposure-only covariate
    #[serde(rename = "Z2")]
    pub z2: f64,
    /// Binary confounder (0/1)
    #[serde(rename = "Z3")]
    pub z3: i32,
    /// Exposure indicator (0/1)
    #[serde(rename = "X")]
    pub x: i32,
    /// Outcome
    #[serde(rename = "Y")]
    pub y: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_propensity() {
        let model = GenerativeModel::default();
        // expit(1.5) at the origin
        let p = model.propensity(0.0, 0.0, 0.0);
        assert!((p - 1.0 / (1.0 + (-1.5f64).exp())).abs() < 1e-12);
        // Z2 lowers, Z1 and Z3 raise the propensity
        assert!(model.propensity(0.0, 1.0, 0.0) < p);
        assert!(model.propensity(1.0, 0.0, 0.0) > p);
        assert!(model.propensity(0.0, 0.0, 1.0) > p);
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let mut model = GenerativeModel::default();
        assert!(model.validate().is_ok());

        model.z3_probability = 1.5;
        assert!(model.validate().is_err());

        let model = GenerativeModel::default().with_threshold_exposure(1.0);
        assert!(model.validate().is_err());

        let mut model = GenerativeModel::default();
        model.outcome = OutcomeKind::Continuous { noise_sd: -1.0 };
        assert!(model.validate().is_err());
    }
}
