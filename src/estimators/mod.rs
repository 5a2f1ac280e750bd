//! Treatment-effect estimators evaluated on one replicate
//!
//! Each replicate yields a g-formula, an IPW and an AIPW estimate of the
//! average treatment effect. Biases are taken against [`TRUE_EFFECT`].

pub mod aipw;
pub mod gformula;
pub mod ipw;

pub use aipw::{AipwEstimate, Z_CRITICAL, aipw, pseudo_outcomes};
pub use gformula::{CounterfactualPredictions, g_formula};
pub use ipw::ipw;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::data::{DataTable, Replicate, TRUE_EFFECT};
use crate::error::{Result, SimulationError};
use crate::models::{FittedModel, IrlsConfig, ModelSpec};

/// Propensities closer than this to 0 or 1 are reported in the log
const EXTREME_PROPENSITY: f64 = 1e-3;

/// Biases and AIPW coverage for a single replicate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplicateEstimate {
    /// Replicate the estimates were computed on
    #[serde(rename = "sim_id")]
    pub replicate_id: u32,
    /// G-formula estimate minus the true effect
    pub g_bias: f64,
    /// IPW estimate minus the true effect
    pub i_bias: f64,
    /// AIPW estimate minus the true effect
    pub a_bias: f64,
    /// 1 when the AIPW interval strictly contains the true effect
    pub a_cov: u8,
}

impl ReplicateEstimate {
    /// Whether the AIPW interval covered the true effect
    #[must_use]
    pub const fn covered(&self) -> bool {
        self.a_cov == 1
    }
}

/// Point estimates of all three estimators on one table
#[derive(Debug, Clone, Copy)]
pub struct EffectEstimates {
    /// Outcome-regression estimate
    pub g_formula: f64,
    /// Inverse-probability-weighted estimate
    pub ipw: f64,
    /// Doubly robust estimate with interval
    pub aipw: AipwEstimate,
}

/// Fit both models on `table` and compute the three estimates
///
/// The exposure column is the response of `exposure_model`; the outcome column
/// is the response of `outcome_model`. The outcome model must use the
/// exposure as a predictor.
pub fn estimate_effects<T: DataTable + ?Sized>(
    table: &T,
    exposure_model: &ModelSpec,
    outcome_model: &ModelSpec,
    irls: &IrlsConfig,
) -> Result<EffectEstimates> {
    let exposure_column = exposure_model.outcome.as_str();
    if !outcome_model.uses(exposure_column) {
        return Err(SimulationError::validation(format!(
            "Outcome model {outcome_model} does not include the exposure {exposure_column}"
        )));
    }

    let propensity = FittedModel::fit(exposure_model, table, irls)?.predict(table)?;
    let extreme = propensity
        .iter()
        .filter(|&&p| p < EXTREME_PROPENSITY || p > 1.0 - EXTREME_PROPENSITY)
        .count();
    if extreme > 0 {
        warn!(
            "{extreme} of {} fitted propensities lie within {EXTREME_PROPENSITY} of 0 or 1",
            propensity.len()
        );
    }

    let outcome_fit = FittedModel::fit(outcome_model, table, irls)?;
    let predictions = CounterfactualPredictions::from_model(&outcome_fit, table, exposure_column)?;

    let y = table.column(&outcome_model.outcome)?;
    let x = table.column(exposure_column)?;

    Ok(EffectEstimates {
        g_formula: g_formula(&predictions),
        ipw: ipw(y, x, &propensity),
        aipw: aipw(y, x, &propensity, &predictions),
    })
}

/// Evaluate one replicate under the given model specifications
pub fn evaluate_replicate(
    replicate: &Replicate,
    exposure_model: &ModelSpec,
    outcome_model: &ModelSpec,
    irls: &IrlsConfig,
) -> Result<ReplicateEstimate> {
    let effects = estimate_effects(replicate, exposure_model, outcome_model, irls)?;
    Ok(ReplicateEstimate {
        replicate_id: replicate.id(),
        g_bias: effects.g_formula - TRUE_EFFECT,
        i_bias: effects.ipw - TRUE_EFFECT,
        a_bias: effects.aipw.estimate - TRUE_EFFECT,
        a_cov: u8::from(effects.aipw.covers(TRUE_EFFECT)),
    })
}
