//! Dense design matrices built from a [`ModelSpec`]

use crate::data::DataTable;
use crate::error::{Result, SimulationError};
use crate::models::spec::ModelSpec;

/// Dense row-major design matrix with a leading intercept column
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    n: usize,
    p: usize,
    data: Vec<f64>,
}

impl DesignMatrix {
    /// Build the design matrix for `spec` from `table`
    ///
    /// `overrides` replaces named predictors by a constant for every row, which
    /// is how counterfactual predictions such as "everyone exposed" are made.
    pub fn build<T: DataTable + ?Sized>(
        spec: &ModelSpec,
        table: &T,
        overrides: &[(&str, f64)],
    ) -> Result<Self> {
        let n = table.num_rows();
        let p = spec.num_coefficients();
        if n == 0 {
            return Err(SimulationError::validation(format!(
                "Cannot build design matrix for {spec}: table is empty"
            )));
        }

        let mut sources: Vec<Source<'_>> = Vec::with_capacity(spec.predictors.len());
        for name in &spec.predictors {
            match overrides.iter().find(|(column, _)| *column == name.as_str()) {
                Some(&(_, value)) => sources.push(Source::Constant(value)),
                None => {
                    let values = table.column(name)?;
                    if values.iter().any(|v| !v.is_finite()) {
                        return Err(SimulationError::validation(format!(
                            "Predictor {name} contains non-finite values"
                        )));
                    }
                    sources.push(Source::Column(values));
                }
            }
        }

        let mut data = Vec::with_capacity(n * p);
        for i in 0..n {
            data.push(1.0);
            for source in &sources {
                data.push(match source {
                    Source::Constant(value) => *value,
                    Source::Column(values) => values[i],
                });
            }
        }

        Ok(Self { n, p, data })
    }

    /// Number of rows
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.n
    }

    /// Number of columns, intercept included
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.p
    }

    /// Borrow one row
    #[inline]
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.p;
        &self.data[start..start + self.p]
    }

    /// `X * beta` for every row
    #[must_use]
    pub fn linear_predictor(&self, beta: &[f64]) -> Vec<f64> {
        debug_assert_eq!(beta.len(), self.p);
        (0..self.n).map(|i| row_dot(self.row(i), beta)).collect()
    }

    /// Weighted cross products `X'WX` (row-major, `p * p`) and `X'Wz`
    ///
    /// Unit weights are used when `weights` is `None`.
    #[must_use]
    pub fn cross_products(&self, weights: Option<&[f64]>, response: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let p = self.p;
        let mut xtx = vec![0.0; p * p];
        let mut xtz = vec![0.0; p];

        for i in 0..self.n {
            let w = weights.map_or(1.0, |w| w[i]);
            let row = self.row(i);
            let wz = w * response[i];
            for a in 0..p {
                let wxa = w * row[a];
                xtz[a] += row[a] * wz;
                // Lower triangle only; mirrored below
                for b in 0..=a {
                    xtx[a * p + b] += wxa * row[b];
                }
            }
        }
        for a in 0..p {
            for b in 0..a {
                xtx[b * p + a] = xtx[a * p + b];
            }
        }

        (xtx, xtz)
    }
}

enum Source<'a> {
    Constant(f64),
    Column(&'a [f64]),
}

#[inline]
fn row_dot(row: &[f64], beta: &[f64]) -> f64 {
    row.iter().zip(beta).map(|(&x, &b)| x * b).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Replicate;

    fn table() -> Replicate {
        Replicate::from_columns(
            0,
            vec![1.0, 2.0, 3.0],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 1.0],
            vec![2.0, 3.0, 4.0],
        )
        .unwrap()
    }

    #[test]
    fn test_intercept_and_order() {
        let spec = ModelSpec::linear("Y", &["X", "Z1"]);
        let design = DesignMatrix::build(&spec, &table(), &[]).unwrap();
        assert_eq!(design.rows(), 3);
        assert_eq!(design.cols(), 3);
        assert_eq!(design.row(1), &[1.0, 0.0, 2.0]);
    }

    #[test]
    fn test_override_sets_constant() {
        let spec = ModelSpec::linear("Y", &["X", "Z1"]);
        let design = DesignMatrix::build(&spec, &table(), &[("X", 1.0)]).unwrap();
        assert!((0..3).all(|i| design.row(i)[1] == 1.0));
        assert_eq!(design.row(2)[2], 3.0);
    }

    #[test]
    fn test_unknown_column() {
        let spec = ModelSpec::linear("Y", &["W"]);
        assert!(DesignMatrix::build(&spec, &table(), &[]).is_err());
    }

    #[test]
    fn test_cross_products_symmetric() {
        let spec = ModelSpec::linear("Y", &["X", "Z1"]);
        let design = DesignMatrix::build(&spec, &table(), &[]).unwrap();
        let (xtx, xtz) = design.cross_products(None, &[2.0, 3.0, 4.0]);
        // Intercept block counts rows
        assert_eq!(xtx[0], 3.0);
        for a in 0..3 {
            for b in 0..3 {
                assert_eq!(xtx[a * 3 + b], xtx[b * 3 + a]);
            }
        }
        // Sum of response
        assert_eq!(xtz[0], 9.0);
        // Sum of Z1 * Y = 2 + 6 + 12
        assert_eq!(xtz[2], 20.0);
    }
}
