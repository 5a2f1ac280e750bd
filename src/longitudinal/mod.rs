//! Time-varying treatment demonstration
//!
//! Binary trajectories `L0 -> A0 -> L1 -> A1 -> Y`, their structured tree
//! graph layout and a parametric g-formula for static treatment regimes.

pub mod generator;
pub mod gformula;
pub mod sample;
pub mod tree;

pub use generator::LongitudinalModel;
pub use gformula::{ParametricGFormula, RegimeOutcome, TreatmentRegime};
pub use sample::LongitudinalSample;
pub use tree::{tree_positions, write_positions_csv};
