//! Per-scenario output files

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::report::plot::write_bias_plot;
use crate::report::summary::SimulationReport;
use crate::utils::log_warning;

/// Fewest replicates a bias density can be estimated from
pub const MIN_PLOT_REPLICATES: usize = 2;

/// Files written for one scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutputs {
    /// Per-replicate estimates
    pub estimates_csv: PathBuf,
    /// Aggregate summary
    pub summary_json: PathBuf,
    /// Bias density plot, when one was drawn
    pub plot: Option<PathBuf>,
}

/// Write `{slug}_estimates.csv`, `{slug}_summary.json` and optionally `{slug}.svg`
///
/// A report with fewer than [`MIN_PLOT_REPLICATES`] replicates has no density
/// to draw; the plot is skipped with a warning and the other files are still
/// written.
pub fn write_scenario_outputs(
    report: &SimulationReport,
    dir: &Path,
    slug: &str,
    plot: bool,
) -> Result<ScenarioOutputs> {
    let estimates_csv = dir.join(format!("{slug}_estimates.csv"));
    report.write_estimates_csv(&estimates_csv)?;

    let summary_json = dir.join(format!("{slug}_summary.json"));
    report.write_summary_json(&summary_json)?;

    let plot = if !plot {
        None
    } else if report.replicates() < MIN_PLOT_REPLICATES {
        let svg = dir.join(format!("{slug}.svg"));
        log_warning(
            &format!(
                "Skipping bias plot: {} replicate(s), need at least {MIN_PLOT_REPLICATES}",
                report.replicates()
            ),
            Some(&svg),
        );
        None
    } else {
        let svg = dir.join(format!("{slug}.svg"));
        write_bias_plot(report, &svg)?;
        Some(svg)
    };

    Ok(ScenarioOutputs {
        estimates_csv,
        summary_json,
        plot,
    })
}
