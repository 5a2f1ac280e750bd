//! A collection of equally sized replicates

use crate::data::table::Replicate;
use crate::error::{Result, SimulationError};

/// All replicates of a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    replicates: Vec<Replicate>,
}

impl Population {
    /// Wrap replicates, enforcing a common record count
    pub fn new(replicates: Vec<Replicate>) -> Result<Self> {
        if let Some(first) = replicates.first() {
            let expected = first.len();
            if let Some(odd) = replicates.iter().find(|r| r.len() != expected) {
                return Err(SimulationError::validation(format!(
                    "Replicate {} has {} units, expected {expected}",
                    odd.id(),
                    odd.len()
                )));
            }
        }
        Ok(Self { replicates })
    }

    /// Borrow the replicates in identifier order
    #[must_use]
    pub fn replicates(&self) -> &[Replicate] {
        &self.replicates
    }

    /// Number of replicates
    #[must_use]
    pub fn len(&self) -> usize {
        self.replicates.len()
    }

    /// Whether there are no replicates
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replicates.is_empty()
    }

    /// Units in each replicate (zero for an empty population)
    #[must_use]
    pub fn units_per_replicate(&self) -> usize {
        self.replicates.first().map_or(0, Replicate::len)
    }

    /// Units across all replicates
    #[must_use]
    pub fn total_units(&self) -> usize {
        self.len() * self.units_per_replicate()
    }
}
