//! Aggregation of per-replicate estimates and the fixed-format report

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, SimulationError};
use crate::estimators::ReplicateEstimate;
use crate::simulation::Scenario;
use crate::utils::{log_operation_complete, log_operation_start, mean, sample_std_dev};

const RULE_HEAVY: &str = "=================================";
const RULE_LIGHT: &str = "---------------------------------";

/// Mean bias and empirical standard error of one estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EstimatorSummary {
    /// Mean of the per-replicate biases
    pub mean_bias: f64,
    /// Sample standard deviation (n - 1) of the biases
    pub empirical_se: f64,
}

impl EstimatorSummary {
    fn from_biases(biases: &[f64]) -> Self {
        Self {
            mean_bias: mean(biases),
            empirical_se: sample_std_dev(biases),
        }
    }
}

/// Aggregate statistics across replicates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportSummary {
    /// Outcome regression
    pub g_formula: EstimatorSummary,
    /// Inverse probability weighting
    pub ipw: EstimatorSummary,
    /// Augmented IPW
    pub aipw: EstimatorSummary,
    /// Share of replicates whose AIPW interval covered the true effect
    pub aipw_coverage: f64,
}

/// Results of one scenario over all replicates
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    scenario: Scenario,
    units_per_replicate: usize,
    summary: ReportSummary,
    #[serde(skip)]
    estimates: Vec<ReplicateEstimate>,
}

impl SimulationReport {
    /// Aggregate the estimates of a scenario
    pub fn new(
        scenario: &Scenario,
        units_per_replicate: usize,
        estimates: Vec<ReplicateEstimate>,
    ) -> Result<Self> {
        if estimates.is_empty() {
            return Err(SimulationError::validation(format!(
                "No replicate estimates to summarise for {}",
                scenario.name
            )));
        }

        let coverage: Vec<f64> = estimates.iter().map(|e| f64::from(e.a_cov)).collect();
        let [g_bias, i_bias, a_bias] = bias_columns(&estimates);
        let summary = ReportSummary {
            g_formula: EstimatorSummary::from_biases(&g_bias),
            ipw: EstimatorSummary::from_biases(&i_bias),
            aipw: EstimatorSummary::from_biases(&a_bias),
            aipw_coverage: mean(&coverage),
        };

        Ok(Self {
            scenario: scenario.clone(),
            units_per_replicate,
            summary,
            estimates,
        })
    }

    /// The scenario that was evaluated
    #[must_use]
    pub const fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Aggregate statistics
    #[must_use]
    pub const fn summary(&self) -> &ReportSummary {
        &self.summary
    }

    /// Per-replicate estimates in replicate order
    #[must_use]
    pub fn estimates(&self) -> &[ReplicateEstimate] {
        &self.estimates
    }

    /// Number of replicates aggregated
    #[must_use]
    pub fn replicates(&self) -> usize {
        self.estimates.len()
    }

    /// Bias columns in the order G-comp, IPW, AIPW
    #[must_use]
    pub fn bias_columns(&self) -> [Vec<f64>; 3] {
        bias_columns(&self.estimates)
    }

    /// Write one CSV row per replicate
    pub fn write_estimates_csv(&self, path: &Path) -> Result<()> {
        log_operation_start("Writing replicate estimates to", path);
        let mut file = BufWriter::new(File::create(path)?);

        writeln!(file, "sim_id,g_bias,i_bias,a_bias,a_cov")?;
        for e in &self.estimates {
            writeln!(
                file,
                "{},{},{},{},{}",
                e.replicate_id, e.g_bias, e.i_bias, e.a_bias, e.a_cov
            )?;
        }
        file.flush()?;

        log_operation_complete("wrote", path, self.estimates.len(), None);
        Ok(())
    }

    /// Write the scenario and its aggregate statistics as pretty JSON
    pub fn write_summary_json(&self, path: &Path) -> Result<()> {
        log_operation_start("Writing summary to", path);
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(file, self)?;
        log_operation_complete("wrote", path, 1, None);
        Ok(())
    }
}

fn bias_columns(estimates: &[ReplicateEstimate]) -> [Vec<f64>; 3] {
    [
        estimates.iter().map(|e| e.g_bias).collect(),
        estimates.iter().map(|e| e.i_bias).collect(),
        estimates.iter().map(|e| e.a_bias).collect(),
    ]
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "{RULE_HEAVY}")?;
        writeln!(f, "Bias")?;
        writeln!(f, "{RULE_LIGHT}")?;
        writeln!(f, "G-comp: {:.6}", s.g_formula.mean_bias)?;
        writeln!(f, "IPW: {:.6}", s.ipw.mean_bias)?;
        writeln!(f, "AIPW: {:.6}", s.aipw.mean_bias)?;
        writeln!(f, "{RULE_LIGHT}")?;
        writeln!(f, "ESE")?;
        writeln!(f, "{RULE_LIGHT}")?;
        writeln!(f, "G-comp: {:.6}", s.g_formula.empirical_se)?;
        writeln!(f, "IPW: {:.6}", s.ipw.empirical_se)?;
        writeln!(f, "AIPW: {:.6}", s.aipw.empirical_se)?;
        writeln!(f, "{RULE_LIGHT}")?;
        writeln!(f, "Coverage")?;
        writeln!(f, "{RULE_LIGHT}")?;
        writeln!(f, "AIPW: {:.6}", s.aipw_coverage)?;
        write!(f, "{RULE_HEAVY}")
    }
}
