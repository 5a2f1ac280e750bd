//! Run configuration for the Monte Carlo simulation.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::data::GenerativeModel;
use crate::utils::{env_flag, env_override};

/// Units drawn per replicate in the reference design
pub const DEFAULT_UNITS_PER_REPLICATE: usize = 2000;
/// Number of replicates in the reference design
pub const DEFAULT_REPLICATES: usize = 2500;
/// Seed used by the reference design
pub const DEFAULT_SEED: u64 = 20_200_513;

/// Configuration for a simulation run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationConfig {
    /// Number of units in every replicate
    pub units_per_replicate: usize,
    /// Number of independent replicates
    pub replicates: usize,
    /// Seed for the run's random source
    pub seed: u64,
    /// Evaluate replicates on the rayon pool
    pub use_parallel: bool,
    /// Worker threads for the rayon pool
    pub threads: usize,
    /// Directory receiving the dataset, estimates, summaries and plots
    pub output_dir: PathBuf,
    /// Write the generated population to Parquet
    pub write_dataset: bool,
    /// Render bias density plots
    pub write_plots: bool,
    /// Show a progress bar while evaluating replicates
    pub show_progress: bool,
    /// Draw a binary outcome and fit logistic outcome models
    pub binary_outcome: bool,
    /// Assign exposure by propensity cut-off instead of a Bernoulli draw
    pub exposure_threshold: Option<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            units_per_replicate: DEFAULT_UNITS_PER_REPLICATE,
            replicates: DEFAULT_REPLICATES,
            seed: DEFAULT_SEED,
            use_parallel: true,
            threads: num_cpus::get(),
            output_dir: PathBuf::from("output"),
            write_dataset: false,
            write_plots: true,
            show_progress: true,
            binary_outcome: false,
            exposure_threshold: None,
        }
    }
}

impl SimulationConfig {
    /// Defaults overridden by `SIM_*` environment variables
    ///
    /// Recognised keys: `SIM_UNITS`, `SIM_REPLICATES`, `SIM_SEED`,
    /// `SIM_PARALLEL`, `SIM_THREADS`, `SIM_OUTPUT_DIR`, `SIM_WRITE_DATASET`,
    /// `SIM_WRITE_PLOTS`, `SIM_PROGRESS`, `SIM_BINARY_OUTCOME`,
    /// `SIM_EXPOSURE_THRESHOLD`.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            units_per_replicate: env_override("SIM_UNITS").unwrap_or(defaults.units_per_replicate),
            replicates: env_override("SIM_REPLICATES").unwrap_or(defaults.replicates),
            seed: env_override("SIM_SEED").unwrap_or(defaults.seed),
            use_parallel: env_flag("SIM_PARALLEL").unwrap_or(defaults.use_parallel),
            threads: env_override("SIM_THREADS").unwrap_or(defaults.threads),
            output_dir: env_override("SIM_OUTPUT_DIR").unwrap_or(defaults.output_dir),
            write_dataset: env_flag("SIM_WRITE_DATASET").unwrap_or(defaults.write_dataset),
            write_plots: env_flag("SIM_WRITE_PLOTS").unwrap_or(defaults.write_plots),
            show_progress: env_flag("SIM_PROGRESS").unwrap_or(defaults.show_progress),
            binary_outcome: env_flag("SIM_BINARY_OUTCOME").unwrap_or(defaults.binary_outcome),
            exposure_threshold: env_override("SIM_EXPOSURE_THRESHOLD")
                .or(defaults.exposure_threshold),
        }
    }

    /// Small, quiet configuration for tests and quick checks
    #[must_use]
    pub fn quick(units_per_replicate: usize, replicates: usize, seed: u64) -> Self {
        Self {
            units_per_replicate,
            replicates,
            seed,
            write_plots: false,
            show_progress: false,
            ..Self::default()
        }
    }
}

impl SimulationConfig {
    /// Generative model implied by the outcome and exposure switches
    #[must_use]
    pub fn generative_model(&self) -> GenerativeModel {
        let mut model = GenerativeModel::default();
        if self.binary_outcome {
            model = model.with_binary_outcome();
        }
        if let Some(cutoff) = self.exposure_threshold {
            model = model.with_threshold_exposure(cutoff);
        }
        model
    }
}

/// Observations in the longitudinal demonstration sample
pub const DEFAULT_LONGITUDINAL_SAMPLE_SIZE: usize = 200;
/// Seed of the longitudinal demonstration
pub const DEFAULT_LONGITUDINAL_SEED: u64 = 1986;
/// Monte Carlo draws of the parametric g-formula
pub const DEFAULT_GFORMULA_RESAMPLES: usize = 1000;

/// Configuration for the time-varying treatment demonstration
#[derive(Debug, Clone, Serialize)]
pub struct LongitudinalConfig {
    /// Observed sample size
    pub sample_size: usize,
    /// Seed for data generation and g-formula simulation
    pub seed: u64,
    /// Units drawn with replacement per treatment regime
    pub resamples: usize,
    /// Directory receiving the tree-position files
    pub output_dir: PathBuf,
}

impl Default for LongitudinalConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_LONGITUDINAL_SAMPLE_SIZE,
            seed: DEFAULT_LONGITUDINAL_SEED,
            resamples: DEFAULT_GFORMULA_RESAMPLES,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl LongitudinalConfig {
    /// Defaults overridden by `LONG_SAMPLE_SIZE`, `LONG_SEED`,
    /// `LONG_RESAMPLES` and `SIM_OUTPUT_DIR`
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            sample_size: env_override("LONG_SAMPLE_SIZE").unwrap_or(defaults.sample_size),
            seed: env_override("LONG_SEED").unwrap_or(defaults.seed),
            resamples: env_override("LONG_RESAMPLES").unwrap_or(defaults.resamples),
            output_dir: env_override("SIM_OUTPUT_DIR").unwrap_or(defaults.output_dir),
        }
    }
}

impl fmt::Display for SimulationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Configuration:")?;
        writeln!(f, "  Units per Replicate: {}", self.units_per_replicate)?;
        writeln!(f, "  Replicates: {}", self.replicates)?;
        writeln!(f, "  Seed: {}", self.seed)?;
        writeln!(f, "  Parallel: {} ({} threads)", self.use_parallel, self.threads)?;
        writeln!(f, "  Output Directory: {}", self.output_dir.display())?;
        writeln!(f, "  Write Dataset: {}", self.write_dataset)?;
        writeln!(f, "  Write Plots: {}", self.write_plots)?;
        writeln!(f, "  Binary Outcome: {}", self.binary_outcome)?;
        match self.exposure_threshold {
            Some(cutoff) => writeln!(f, "  Exposure: threshold at {cutoff}")?,
            None => writeln!(f, "  Exposure: Bernoulli")?,
        }
        Ok(())
    }
}
