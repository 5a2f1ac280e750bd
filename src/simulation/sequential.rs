//! Sequential replicate evaluation for small runs

use log::info;

use crate::data::Replicate;
use crate::error::Result;
use crate::estimators::{ReplicateEstimate, evaluate_replicate};
use crate::models::IrlsConfig;
use crate::simulation::scenario::Scenario;
use crate::utils::logging::progress;

/// Evaluate replicates one after another
pub fn evaluate_sequential(
    replicates: &[Replicate],
    scenario: &Scenario,
    irls: &IrlsConfig,
    show_progress: bool,
) -> Result<Vec<ReplicateEstimate>> {
    info!("Evaluating {} replicates sequentially", replicates.len());

    let pb = progress::replicate_progress_bar(replicates.len(), &scenario.name, show_progress);
    let mut estimates = Vec::with_capacity(replicates.len());
    for replicate in replicates {
        estimates.push(evaluate_replicate(
            replicate,
            &scenario.exposure_model,
            &scenario.outcome_model,
            irls,
        )?);
        pb.inc(1);
    }
    progress::finish_progress_bar(&pb, Some("Replicates evaluated"));

    Ok(estimates)
}
