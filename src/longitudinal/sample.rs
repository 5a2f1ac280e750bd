//! Binary longitudinal records `(L0, A0, L1, A1, Y)`

use crate::data::DataTable;
use crate::error::{Result, SimulationError};
use crate::longitudinal::tree::{PATH_LENGTH, tree_positions};
use crate::utils::mean;

/// Column names of the longitudinal table
pub mod columns {
    /// Baseline covariate
    pub const L0: &str = "L0";
    /// First treatment
    pub const A0: &str = "A0";
    /// Time-varying covariate
    pub const L1: &str = "L1";
    /// Second treatment
    pub const A1: &str = "A1";
    /// Final outcome
    pub const Y: &str = "Y";
}

/// Columnar sample of binary trajectories
#[derive(Debug, Clone, PartialEq)]
pub struct LongitudinalSample {
    l0: Vec<f64>,
    a0: Vec<f64>,
    l1: Vec<f64>,
    a1: Vec<f64>,
    y: Vec<f64>,
}

impl LongitudinalSample {
    /// Assemble from 0/1 columns of equal length
    pub fn from_columns(
        l0: Vec<f64>,
        a0: Vec<f64>,
        l1: Vec<f64>,
        a1: Vec<f64>,
        y: Vec<f64>,
    ) -> Result<Self> {
        let n = l0.len();
        for (name, values) in [
            (columns::L0, &l0),
            (columns::A0, &a0),
            (columns::L1, &l1),
            (columns::A1, &a1),
            (columns::Y, &y),
        ] {
            if values.len() != n {
                return Err(SimulationError::validation(format!(
                    "Column {name} has {} rows, expected {n}",
                    values.len()
                )));
            }
            if values.iter().any(|&v| v != 0.0 && v != 1.0) {
                return Err(SimulationError::validation(format!(
                    "Column {name} must contain only 0/1 values"
                )));
            }
        }
        Ok(Self { l0, a0, l1, a1, y })
    }

    /// Number of trajectories
    #[must_use]
    pub fn len(&self) -> usize {
        self.l0.len()
    }

    /// Whether the sample is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.l0.is_empty()
    }

    /// Decision path of unit `i`
    #[must_use]
    pub fn path(&self, i: usize) -> [bool; PATH_LENGTH] {
        [
            self.l0[i] == 1.0,
            self.a0[i] == 1.0,
            self.l1[i] == 1.0,
            self.a1[i] == 1.0,
            self.y[i] == 1.0,
        ]
    }

    /// Tree-graph positions of every unit
    pub fn positions(&self) -> impl Iterator<Item = [f64; PATH_LENGTH + 1]> + '_ {
        (0..self.len()).map(|i| tree_positions(self.path(i)))
    }

    /// Share of units with `Y = 1`
    #[must_use]
    pub fn risk(&self) -> f64 {
        mean(&self.y)
    }

    /// Units whose observed treatments match `(a0, a1)`
    #[must_use]
    pub fn count_following(&self, a0: bool, a1: bool) -> usize {
        self.a0
            .iter()
            .zip(&self.a1)
            .filter(|&(&x0, &x1)| (x0 == 1.0) == a0 && (x1 == 1.0) == a1)
            .count()
    }
}

impl DataTable for LongitudinalSample {
    fn num_rows(&self) -> usize {
        self.len()
    }

    fn column(&self, name: &str) -> Result<&[f64]> {
        match name {
            columns::L0 => Ok(&self.l0),
            columns::A0 => Ok(&self.a0),
            columns::L1 => Ok(&self.l1),
            columns::A1 => Ok(&self.a1),
            columns::Y => Ok(&self.y),
            other => Err(SimulationError::MissingColumn(other.to_string())),
        }
    }
}
