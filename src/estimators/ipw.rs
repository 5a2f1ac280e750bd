//! Inverse-probability-of-treatment weighting

/// `mean(Y*X/ps) - mean(Y*(1-X)/(1-ps))`
///
/// Propensities at exactly 0 or 1 make the weights diverge; they are not
/// truncated.
#[must_use]
pub fn ipw(outcome: &[f64], exposure: &[f64], propensity: &[f64]) -> f64 {
    debug_assert_eq!(outcome.len(), exposure.len());
    debug_assert_eq!(outcome.len(), propensity.len());
    let n = outcome.len() as f64;
    let total: f64 = outcome
        .iter()
        .zip(exposure)
        .zip(propensity)
        .map(|((&y, &x), &ps)| y * x / ps - y * (1.0 - x) / (1.0 - ps))
        .sum();
    total / n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_weights() {
        // Treated: 2/0.5 = 4, untreated: 1/(1-0.5) = 2
        let estimate = ipw(&[2.0, 1.0], &[1.0, 0.0], &[0.5, 0.5]);
        assert!((estimate - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_randomised_exposure_with_constant_outcome() {
        // Equal outcomes and a correct propensity of one half give zero
        let y = [3.0, 3.0, 3.0, 3.0];
        let x = [1.0, 0.0, 1.0, 0.0];
        let ps = [0.5; 4];
        assert!(ipw(&y, &x, &ps).abs() < 1e-12);
    }
}
