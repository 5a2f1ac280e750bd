//! Parametric g-formula for a static two-period treatment regime
//!
//! Fits `L1 ~ L0 + A0` and `Y ~ L0 + L1 + A0 + A1`, resamples baseline
//! covariates with replacement and simulates forward with the treatments
//! held fixed.

use std::fmt;

use log::{debug, info};
use rand::Rng;
use serde::Serialize;

use crate::config::DEFAULT_GFORMULA_RESAMPLES;
use crate::data::DataTable;
use crate::error::{Result, SimulationError};
use crate::longitudinal::sample::{LongitudinalSample, columns};
use crate::models::{FittedModel, IrlsConfig, ModelSpec};

/// Treatment assigned at both time points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreatmentRegime {
    /// Treatment at time 0
    pub a0: bool,
    /// Treatment at time 1
    pub a1: bool,
}

impl TreatmentRegime {
    /// Treated at both times
    pub const ALWAYS: Self = Self { a0: true, a1: true };
    /// Never treated
    pub const NEVER: Self = Self {
        a0: false,
        a1: false,
    };
}

impl fmt::Display for TreatmentRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(A0={}, A1={})", u8::from(self.a0), u8::from(self.a1))
    }
}

/// Simulated trajectories under one regime
#[derive(Debug, Clone)]
pub struct RegimeOutcome {
    /// Regime that was imposed
    pub regime: TreatmentRegime,
    /// Simulated share with `Y = 1`
    pub risk: f64,
    /// The simulated trajectories
    pub sample: LongitudinalSample,
}

/// Fitted covariate and outcome models of the g-formula
#[derive(Debug, Clone)]
pub struct ParametricGFormula {
    covariate_model: FittedModel,
    outcome_model: FittedModel,
    resamples: usize,
}

fn bernoulli_draws<R: Rng>(probabilities: &[f64], rng: &mut R) -> Vec<f64> {
    probabilities
        .iter()
        .map(|&p| if rng.random_bool(p) { 1.0 } else { 0.0 })
        .collect()
}

impl ParametricGFormula {
    /// Fit both logistic models on the observed sample
    pub fn fit(observed: &LongitudinalSample, irls: &IrlsConfig) -> Result<Self> {
        let covariate_spec = ModelSpec::logistic(columns::L1, &[columns::L0, columns::A0]);
        let outcome_spec = ModelSpec::logistic(
            columns::Y,
            &[columns::L0, columns::L1, columns::A0, columns::A1],
        );

        let covariate_model = FittedModel::fit(&covariate_spec, observed, irls)?;
        let outcome_model = FittedModel::fit(&outcome_spec, observed, irls)?;
        debug!(
            "g-formula models: {} -> {:?}; {} -> {:?}",
            covariate_spec,
            covariate_model.coefficients(),
            outcome_spec,
            outcome_model.coefficients()
        );

        Ok(Self {
            covariate_model,
            outcome_model,
            resamples: DEFAULT_GFORMULA_RESAMPLES,
        })
    }

    /// Change the number of simulated units per regime
    #[must_use]
    pub const fn with_resamples(mut self, resamples: usize) -> Self {
        self.resamples = resamples;
        self
    }

    /// Fitted `L1 ~ L0 + A0`
    #[must_use]
    pub const fn covariate_model(&self) -> &FittedModel {
        &self.covariate_model
    }

    /// Fitted `Y ~ L0 + L1 + A0 + A1`
    #[must_use]
    pub const fn outcome_model(&self) -> &FittedModel {
        &self.outcome_model
    }

    /// Simulate trajectories with both treatments fixed by `regime`
    pub fn simulate<R: Rng>(
        &self,
        observed: &LongitudinalSample,
        regime: TreatmentRegime,
        rng: &mut R,
    ) -> Result<RegimeOutcome> {
        if observed.is_empty() {
            return Err(SimulationError::validation(
                "Cannot resample from an empty longitudinal sample",
            ));
        }
        let m = self.resamples;
        let baseline = observed.column(columns::L0)?;
        let l0: Vec<f64> = (0..m)
            .map(|_| baseline[rng.random_range(0..baseline.len())])
            .collect();
        let a0 = vec![f64::from(u8::from(regime.a0)); m];
        let a1 = vec![f64::from(u8::from(regime.a1)); m];

        // L1, A1 and Y are placeholders until drawn
        let stage = LongitudinalSample::from_columns(
            l0.clone(),
            a0.clone(),
            vec![0.0; m],
            a1.clone(),
            vec![0.0; m],
        )?;
        let l1 = bernoulli_draws(&self.covariate_model.predict(&stage)?, rng);

        let stage = LongitudinalSample::from_columns(
            l0.clone(),
            a0.clone(),
            l1.clone(),
            a1.clone(),
            vec![0.0; m],
        )?;
        let y = bernoulli_draws(&self.outcome_model.predict(&stage)?, rng);

        let sample = LongitudinalSample::from_columns(l0, a0, l1, a1, y)?;
        let risk = sample.risk();
        info!("Regime {regime}: simulated risk {risk:.4} over {m} draws");

        Ok(RegimeOutcome {
            regime,
            risk,
            sample,
        })
    }

    /// Risks under two regimes and their difference `treated - reference`
    pub fn risk_difference<R: Rng>(
        &self,
        observed: &LongitudinalSample,
        treated: TreatmentRegime,
        reference: TreatmentRegime,
        rng: &mut R,
    ) -> Result<(RegimeOutcome, RegimeOutcome, f64)> {
        let a = self.simulate(observed, treated, rng)?;
        let b = self.simulate(observed, reference, rng)?;
        let difference = a.risk - b.risk;
        Ok((a, b, difference))
    }
}
