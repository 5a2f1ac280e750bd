//! Model-specification scenarios
//!
//! A scenario pairs an exposure (propensity) model with an outcome model. The
//! standard set crosses a correct and a misspecified version of each.

use std::fmt;

use serde::Serialize;

use crate::data::columns::{X, Y, Z1, Z3};
use crate::models::{Link, ModelSpec};

/// Exposure and outcome model fitted on every replicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    /// Short label used in reports and file names
    pub name: String,
    /// Propensity model, response is the exposure
    pub exposure_model: ModelSpec,
    /// Outcome model, must include the exposure
    pub outcome_model: ModelSpec,
}

impl Scenario {
    /// Create a scenario
    #[must_use]
    pub fn new(name: &str, exposure_model: ModelSpec, outcome_model: ModelSpec) -> Self {
        Self {
            name: name.to_string(),
            exposure_model,
            outcome_model,
        }
    }

    /// Same scenario with the outcome model fitted under another link
    #[must_use]
    pub fn with_outcome_link(mut self, link: Link) -> Self {
        self.outcome_model.link = link;
        self
    }

    /// File-system friendly version of the name
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect()
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: exposure {}, outcome {}",
            self.name, self.exposure_model, self.outcome_model
        )
    }
}

/// The four scenarios: both models correct, exposure model missing `Z3`,
/// outcome model missing `Z3`, and both missing `Z3`
#[must_use]
pub fn standard_scenarios() -> Vec<Scenario> {
    let exposure_correct = ModelSpec::logistic(X, &[Z1, Z3]);
    let exposure_wrong = ModelSpec::logistic(X, &[Z1]);
    let outcome_correct = ModelSpec::linear(Y, &[X, Z1, Z3]);
    let outcome_wrong = ModelSpec::linear(Y, &[X, Z1]);

    vec![
        Scenario::new("Scenario 1", exposure_correct.clone(), outcome_correct.clone()),
        Scenario::new("Scenario 2", exposure_wrong.clone(), outcome_correct),
        Scenario::new("Scenario 3", exposure_correct, outcome_wrong.clone()),
        Scenario::new("Scenario 4", exposure_wrong, outcome_wrong),
    ]
}
