//! Structured regression model specifications
//!
//! A model is named by its response column, its predictor columns and a link
//! function. An intercept is always included.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::utils::expit;

/// Link between the linear predictor and the mean of the response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Link {
    /// Ordinary least squares, `E[y] = eta`
    Identity,
    /// Logistic regression, `E[y] = expit(eta)`
    Logit,
}

impl Link {
    /// Map a linear predictor onto the response scale
    #[inline]
    #[must_use]
    pub fn inverse(self, eta: f64) -> f64 {
        match self {
            Self::Identity => eta,
            Self::Logit => expit(eta),
        }
    }

    /// Short lowercase name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Logit => "logit",
        }
    }
}

/// Response, predictors and link of a regression model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Response column
    pub outcome: String,
    /// Predictor columns, in coefficient order after the intercept
    pub predictors: SmallVec<[String; 4]>,
    /// Link function
    pub link: Link,
}

impl ModelSpec {
    /// Create a model specification
    #[must_use]
    pub fn new(outcome: &str, predictors: &[&str], link: Link) -> Self {
        Self {
            outcome: outcome.to_string(),
            predictors: predictors.iter().map(|p| (*p).to_string()).collect(),
            link,
        }
    }

    /// Linear model fitted by least squares
    #[must_use]
    pub fn linear(outcome: &str, predictors: &[&str]) -> Self {
        Self::new(outcome, predictors, Link::Identity)
    }

    /// Logistic model fitted by maximum likelihood
    #[must_use]
    pub fn logistic(outcome: &str, predictors: &[&str]) -> Self {
        Self::new(outcome, predictors, Link::Logit)
    }

    /// Number of coefficients including the intercept
    #[must_use]
    pub fn num_coefficients(&self) -> usize {
        self.predictors.len() + 1
    }

    /// Whether a column enters as a predictor
    #[must_use]
    pub fn uses(&self, column: &str) -> bool {
        self.predictors.iter().any(|p| p == column)
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ ", self.outcome)?;
        if self.predictors.is_empty() {
            write!(f, "1")?;
        } else {
            write!(f, "{}", self.predictors.join(" + "))?;
        }
        write!(f, " [{}]", self.link.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let spec = ModelSpec::linear("Y", &["X", "Z1", "Z3"]);
        assert_eq!(spec.to_string(), "Y ~ X + Z1 + Z3 [identity]");

        let intercept_only = ModelSpec::logistic("X", &[]);
        assert_eq!(intercept_only.to_string(), "X ~ 1 [logit]");
    }

    #[test]
    fn test_coefficients_and_membership() {
        let spec = ModelSpec::logistic("X", &["Z1", "Z3"]);
        assert_eq!(spec.num_coefficients(), 3);
        assert!(spec.uses("Z3"));
        assert!(!spec.uses("X"));
    }

    #[test]
    fn test_link_inverse() {
        assert_eq!(Link::Identity.inverse(2.5), 2.5);
        assert!((Link::Logit.inverse(0.0) - 0.5).abs() < 1e-15);
    }
}
