//! Parallel replicate evaluation on the rayon pool
//!
//! Replicates share nothing mutable, so each is evaluated independently and
//! the results are collected back in replicate order.

use indicatif::ParallelProgressIterator;
use log::info;
use rayon::prelude::*;

use crate::data::Replicate;
use crate::error::Result;
use crate::estimators::{ReplicateEstimate, evaluate_replicate};
use crate::models::IrlsConfig;
use crate::simulation::scenario::Scenario;
use crate::utils::logging::progress;

/// Evaluate replicates across the current rayon pool
pub fn evaluate_parallel(
    replicates: &[Replicate],
    scenario: &Scenario,
    irls: &IrlsConfig,
    show_progress: bool,
) -> Result<Vec<ReplicateEstimate>> {
    info!(
        "Evaluating {} replicates with {} threads",
        replicates.len(),
        rayon::current_num_threads()
    );

    let pb = progress::replicate_progress_bar(replicates.len(), &scenario.name, show_progress);
    let estimates = replicates
        .par_iter()
        .progress_with(pb.clone())
        .map(|replicate| {
            evaluate_replicate(
                replicate,
                &scenario.exposure_model,
                &scenario.outcome_model,
                irls,
            )
        })
        .collect::<Result<Vec<_>>>()?;
    progress::finish_progress_bar(&pb, Some("Replicates evaluated"));

    Ok(estimates)
}
