//! Aggregate reports, bias density estimation and plotting

pub mod kde;
pub mod outputs;
pub mod plot;
pub mod summary;

pub use kde::GaussianKde;
pub use outputs::{MIN_PLOT_REPLICATES, ScenarioOutputs, write_scenario_outputs};
pub use plot::{DensityCurve, bias_curves, render_density_svg, write_bias_plot};
pub use summary::{EstimatorSummary, ReportSummary, SimulationReport};
