//! Regression models used by the estimators
//!
//! Models are described by a [`ModelSpec`] and fitted against anything that
//! implements [`DataTable`]. Identity-link models are fitted by least squares,
//! logit-link models by IRLS maximum likelihood.

pub mod design;
pub mod logistic;
pub mod ols;
pub mod spec;

pub use design::DesignMatrix;
pub use logistic::{IrlsConfig, IrlsResult, fit_logistic};
pub use ols::fit_ols;
pub use spec::{Link, ModelSpec};

use crate::data::DataTable;
use crate::error::{Result, SimulationError};

/// A regression model with estimated coefficients
#[derive(Debug, Clone)]
pub struct FittedModel {
    spec: ModelSpec,
    coefficients: Vec<f64>,
    iterations: usize,
}

impl FittedModel {
    /// Fit `spec` to `table`
    pub fn fit<T: DataTable + ?Sized>(
        spec: &ModelSpec,
        table: &T,
        irls: &IrlsConfig,
    ) -> Result<Self> {
        if spec.uses(&spec.outcome) {
            return Err(SimulationError::validation(format!(
                "Response {} also appears as a predictor in {spec}",
                spec.outcome
            )));
        }
        let design = DesignMatrix::build(spec, table, &[])?;
        let response = table.column(&spec.outcome)?;

        let (coefficients, iterations) = match spec.link {
            Link::Identity => (fit_ols(&design, response)?, 1),
            Link::Logit => {
                let result = fit_logistic(&design, response, irls)?;
                (result.coefficients, result.iterations)
            }
        };

        Ok(Self {
            spec: spec.clone(),
            coefficients,
            iterations,
        })
    }

    /// Intercept first, then predictors in specification order
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// IRLS iterations (1 for least squares)
    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    /// Coefficient of a named predictor, if the model uses it
    #[must_use]
    pub fn coefficient(&self, predictor: &str) -> Option<f64> {
        self.spec
            .predictors
            .iter()
            .position(|p| p == predictor)
            .map(|i| self.coefficients[i + 1])
    }

    /// Predictions on the response scale for every row of `table`
    pub fn predict<T: DataTable + ?Sized>(&self, table: &T) -> Result<Vec<f64>> {
        self.predict_with(table, &[])
    }

    /// Predictions with some predictors held at constant values
    ///
    /// Overrides naming a column the model does not use have no effect.
    pub fn predict_with<T: DataTable + ?Sized>(
        &self,
        table: &T,
        overrides: &[(&str, f64)],
    ) -> Result<Vec<f64>> {
        let design = DesignMatrix::build(&self.spec, table, overrides)?;
        let link = self.spec.link;
        Ok(design
            .linear_predictor(&self.coefficients)
            .into_iter()
            .map(|eta| link.inverse(eta))
            .collect())
    }
}
