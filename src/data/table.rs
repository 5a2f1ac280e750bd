//! Columnar tables consumed by the regression models

use crate::data::model::{UnitRecord, columns};
use crate::error::{Result, SimulationError};

/// Read access to named numeric columns of equal length
///
/// Binary columns are stored as `0.0`/`1.0` so they can enter a design matrix
/// directly.
pub trait DataTable {
    /// Number of rows in every column
    fn num_rows(&self) -> usize;

    /// Borrow a column by name
    fn column(&self, name: &str) -> Result<&[f64]>;
}

/// One synthetic sample of units sharing a replicate identifier
#[derive(Debug, Clone, PartialEq)]
pub struct Replicate {
    id: u32,
    z1: Vec<f64>,
    z2: Vec<f64>,
    z3: Vec<f64>,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Replicate {
    /// Assemble a replicate from its columns
    ///
    /// All columns must have the same length and `Z3`/`X` must be binary.
    pub fn from_columns(
        id: u32,
        z1: Vec<f64>,
        z2: Vec<f64>,
        z3: Vec<f64>,
        x: Vec<f64>,
        y: Vec<f64>,
    ) -> Result<Self> {
        let n = z1.len();
        for (name, len) in [
            (columns::Z2, z2.len()),
            (columns::Z3, z3.len()),
            (columns::X, x.len()),
            (columns::Y, y.len()),
        ] {
            if len != n {
                return Err(SimulationError::validation(format!(
                    "Column {name} has {len} rows, expected {n} (replicate {id})"
                )));
            }
        }
        for (name, values) in [(columns::Z3, &z3), (columns::X, &x)] {
            if values.iter().any(|&v| v != 0.0 && v != 1.0) {
                return Err(SimulationError::validation(format!(
                    "Column {name} must contain only 0/1 values (replicate {id})"
                )));
            }
        }
        Ok(Self { id, z1, z2, z3, x, y })
    }

    /// Rebuild a replicate from flat-file records
    pub fn from_records(id: u32, records: &[UnitRecord]) -> Result<Self> {
        if let Some(stray) = records.iter().find(|r| r.replicate_id != id) {
            return Err(SimulationError::validation(format!(
                "Record with replicate id {} found while assembling replicate {id}",
                stray.replicate_id
            )));
        }
        Self::from_columns(
            id,
            records.iter().map(|r| r.z1).collect(),
            records.iter().map(|r| r.z2).collect(),
            records.iter().map(|r| f64::from(r.z3)).collect(),
            records.iter().map(|r| f64::from(r.x)).collect(),
            records.iter().map(|r| r.y).collect(),
        )
    }

    /// Replicate identifier
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Number of units
    #[must_use]
    pub fn len(&self) -> usize {
        self.z1.len()
    }

    /// Whether the replicate holds no units
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.z1.is_empty()
    }

    /// Observed exposure
    #[must_use]
    pub fn exposure(&self) -> &[f64] {
        &self.x
    }

    /// Observed outcome
    #[must_use]
    pub fn outcome(&self) -> &[f64] {
        &self.y
    }

    /// Row-wise view for export
    pub fn records(&self) -> impl Iterator<Item = UnitRecord> + '_ {
        (0..self.len()).map(move |i| UnitRecord {
            replicate_id: self.id,
            z1: self.z1[i],
            z2: self.z2[i],
            z3: self.z3[i] as i32,
            x: self.x[i] as i32,
            y: self.y[i],
        })
    }
}

impl DataTable for Replicate {
    fn num_rows(&self) -> usize {
        self.len()
    }

    fn column(&self, name: &str) -> Result<&[f64]> {
        match name {
            columns::Z1 => Ok(&self.z1),
            columns::Z2 => Ok(&self.z2),
            columns::Z3 => Ok(&self.z3),
            columns::X => Ok(&self.x),
            columns::Y => Ok(&self.y),
            other => Err(SimulationError::MissingColumn(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> Replicate {
        Replicate::from_columns(
            3,
            vec![0.1, -0.2],
            vec![1.0, 2.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.5, -1.5],
        )
        .unwrap()
    }

    #[test]
    fn test_column_lookup() {
        let rep = tiny();
        assert_eq!(rep.num_rows(), 2);
        assert_eq!(rep.column("Z2").unwrap(), &[1.0, 2.0]);
        assert!(matches!(
            rep.column("L0"),
            Err(SimulationError::MissingColumn(name)) if name == "L0"
        ));
    }

    #[test]
    fn test_rejects_ragged_and_non_binary_columns() {
        let ragged = Replicate::from_columns(
            0,
            vec![0.0, 1.0],
            vec![0.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
        );
        assert!(ragged.is_err());

        let non_binary = Replicate::from_columns(
            0,
            vec![0.0],
            vec![0.0],
            vec![0.5],
            vec![0.0],
            vec![0.0],
        );
        assert!(non_binary.is_err());
    }

    #[test]
    fn test_records_round_trip() {
        let rep = tiny();
        let records: Vec<UnitRecord> = rep.records().collect();
        assert_eq!(records[1].z3, 1);
        assert_eq!(records[0].x, 1);
        assert_eq!(records[0].replicate_id, 3);

        let rebuilt = Replicate::from_records(3, &records).unwrap();
        assert_eq!(rebuilt, rep);
        assert!(Replicate::from_records(4, &records).is_err());
    }
}
