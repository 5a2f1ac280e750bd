//! Monte Carlo evaluation of treatment-effect estimators on synthetic
//! confounded data, with a small time-varying treatment demonstration.

pub mod config;
pub mod data;
pub mod error;
pub mod estimators;
pub mod longitudinal;
pub mod models;
pub mod report;
pub mod simulation;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{LongitudinalConfig, SimulationConfig};
pub use error::{Result, SimulationError};

// Data generation and persistence
pub use data::{
    DataTable, GenerativeModel, Population, PopulationGenerator, Replicate, TRUE_EFFECT,
    read_population, write_population,
};

// Models and estimators
pub use estimators::{ReplicateEstimate, evaluate_replicate};
pub use models::{FittedModel, IrlsConfig, Link, ModelSpec};

// Simulation loop and reporting
pub use report::{SimulationReport, write_bias_plot, write_scenario_outputs};
pub use simulation::{Scenario, SimulationRunner, standard_scenarios};

// Arrow types
pub use arrow::record_batch::RecordBatch;
