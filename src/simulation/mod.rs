//! The simulation-evaluation loop
//!
//! Every replicate of a population is evaluated under a [`Scenario`], either
//! sequentially or on the rayon pool, and the estimates are aggregated into a
//! [`SimulationReport`](crate::report::SimulationReport).

pub mod parallel;
pub mod runner;
pub mod scenario;
pub mod sequential;

pub use parallel::evaluate_parallel;
pub use runner::SimulationRunner;
pub use scenario::{Scenario, standard_scenarios};
pub use sequential::evaluate_sequential;
