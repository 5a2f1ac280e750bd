//! Ordinary least squares through the normal equations

use nalgebra::{DMatrix, DVector};

use crate::error::{Result, SimulationError};
use crate::models::design::DesignMatrix;

/// Solve the symmetric system `A x = b` for a `d * d` row-major `A`
///
/// Cholesky is tried first; LU is the fallback for systems that are not
/// numerically positive definite.
pub fn solve_normal_equations(a: &[f64], b: Vec<f64>, d: usize) -> Result<Vec<f64>> {
    let matrix = DMatrix::from_row_slice(d, d, a);
    let rhs = DVector::from_vec(b);

    let solution = match matrix.clone().cholesky() {
        Some(chol) => chol.solve(&rhs),
        None => matrix.lu().solve(&rhs).ok_or_else(|| {
            SimulationError::SingularSystem(
                "normal equations are singular (collinear or constant predictors)".to_string(),
            )
        })?,
    };

    if solution.iter().any(|v| !v.is_finite()) {
        return Err(SimulationError::SingularSystem(
            "normal equations produced non-finite coefficients".to_string(),
        ));
    }
    Ok(solution.iter().copied().collect())
}

/// Least-squares coefficients for `y ~ X`
pub fn fit_ols(design: &DesignMatrix, y: &[f64]) -> Result<Vec<f64>> {
    if y.len() != design.rows() {
        return Err(SimulationError::validation(format!(
            "Response has {} rows, design matrix has {}",
            y.len(),
            design.rows()
        )));
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(SimulationError::validation(
            "Response contains non-finite values",
        ));
    }
    let (xtx, xty) = design.cross_products(None, y);
    solve_normal_equations(&xtx, xty, design.cols())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Replicate;
    use crate::models::spec::ModelSpec;

    #[test]
    fn test_exact_fit_recovers_coefficients() {
        // Y = 1 + 2 * Z1 - 3 * X exactly
        let z1 = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let x = vec![0.0, 1.0, 0.0, 1.0, 1.0, 0.0];
        let y: Vec<f64> = z1
            .iter()
            .zip(&x)
            .map(|(a, b)| 1.0 + 2.0 * a - 3.0 * b)
            .collect();
        let table =
            Replicate::from_columns(0, z1, vec![0.0; 6], vec![0.0; 6], x, y.clone()).unwrap();
        let spec = ModelSpec::linear("Y", &["Z1", "X"]);
        let design = DesignMatrix::build(&spec, &table, &[]).unwrap();

        let beta = fit_ols(&design, &y).unwrap();
        assert!((beta[0] - 1.0).abs() < 1e-10);
        assert!((beta[1] - 2.0).abs() < 1e-10);
        assert!((beta[2] + 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_collinear_predictors_are_rejected() {
        // Z2 is identically zero, so its column is collinear with nothing but
        // contributes a zero row and column to X'X
        let table = Replicate::from_columns(
            0,
            vec![0.0, 1.0, 2.0],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![1.0, 2.0, 3.0],
        )
        .unwrap();
        let spec = ModelSpec::linear("Y", &["Z1", "Z2"]);
        let design = DesignMatrix::build(&spec, &table, &[]).unwrap();
        assert!(matches!(
            fit_ols(&design, &[1.0, 2.0, 3.0]),
            Err(SimulationError::SingularSystem(_))
        ));
    }
}
