//! Outcome-regression (g-formula) estimator

use crate::data::DataTable;
use crate::models::FittedModel;
use crate::error::Result;
use crate::utils::mean;

/// Counterfactual outcome predictions under exposure set to 1 and to 0
#[derive(Debug, Clone)]
pub struct CounterfactualPredictions {
    /// Predicted outcome with every unit exposed
    pub treated: Vec<f64>,
    /// Predicted outcome with every unit unexposed
    pub control: Vec<f64>,
}

impl CounterfactualPredictions {
    /// Predict from a fitted outcome model, overriding the exposure column
    pub fn from_model<T: DataTable + ?Sized>(
        model: &FittedModel,
        table: &T,
        exposure: &str,
    ) -> Result<Self> {
        Ok(Self {
            treated: model.predict_with(table, &[(exposure, 1.0)])?,
            control: model.predict_with(table, &[(exposure, 0.0)])?,
        })
    }
}

/// Mean of the per-unit counterfactual differences
#[must_use]
pub fn g_formula(predictions: &CounterfactualPredictions) -> f64 {
    let differences: Vec<f64> = predictions
        .treated
        .iter()
        .zip(&predictions.control)
        .map(|(t, c)| t - c)
        .collect();
    mean(&differences)
}
