//! Synthetic population generator
//!
//! Draws covariates, exposure and outcome from a [`GenerativeModel`]. The
//! random source is always passed in explicitly; a whole population derives
//! one seed per replicate from the caller's generator, so the result does not
//! depend on how many threads build it.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rayon::prelude::*;
use std::time::Instant;

use crate::data::model::{ExposureAssignment, GenerativeModel, OutcomeKind};
use crate::data::population::Population;
use crate::data::table::Replicate;
use crate::error::{Result, SimulationError};
use crate::utils::expit;

/// Samples replicates from a fixed generative model
#[derive(Debug, Clone)]
pub struct PopulationGenerator {
    model: GenerativeModel,
}

impl Default for PopulationGenerator {
    fn default() -> Self {
        Self {
            model: GenerativeModel::default(),
        }
    }
}

impl PopulationGenerator {
    /// Create a generator, validating the model parameters
    pub fn new(model: GenerativeModel) -> Result<Self> {
        model.validate()?;
        Ok(Self { model })
    }

    /// The generative model in use
    #[must_use]
    pub const fn model(&self) -> &GenerativeModel {
        &self.model
    }

    /// True propensities for a set of covariate columns
    #[must_use]
    pub fn propensities(&self, z1: &[f64], z2: &[f64], z3: &[f64]) -> Vec<f64> {
        z1.iter()
            .zip(z2)
            .zip(z3)
            .map(|((&a, &b), &c)| self.model.propensity(a, b, c))
            .collect()
    }

    /// Draw one replicate of `n` units
    pub fn generate_replicate<R: Rng>(&self, id: u32, n: usize, rng: &mut R) -> Result<Replicate> {
        let model = &self.model;

        let z1: Vec<f64> = (0..n).map(|_| rng.sample::<f64, _>(StandardNormal)).collect();
        let z2: Vec<f64> = (0..n).map(|_| rng.sample::<f64, _>(StandardNormal)).collect();
        let z3: Vec<f64> = (0..n)
            .map(|_| indicator(rng.random_bool(model.z3_probability)))
            .collect();

        let propensities = self.propensities(&z1, &z2, &z3);
        let x: Vec<f64> = match model.exposure_assignment {
            ExposureAssignment::Bernoulli => propensities
                .iter()
                .map(|&p| indicator(rng.random_bool(p)))
                .collect(),
            ExposureAssignment::Threshold(cutoff) => {
                propensities.iter().map(|&p| indicator(p < cutoff)).collect()
            }
        };

        let y: Vec<f64> = match model.outcome {
            OutcomeKind::Continuous { noise_sd } => z1
                .iter()
                .zip(&z3)
                .map(|(&a, &c)| {
                    model.outcome_mean(a, c) + noise_sd * rng.sample::<f64, _>(StandardNormal)
                })
                .collect(),
            OutcomeKind::Binary => z1
                .iter()
                .zip(&z3)
                .map(|(&a, &c)| indicator(rng.random_bool(expit(model.outcome_mean(a, c)))))
                .collect(),
        };

        debug!(
            "Replicate {id}: {} of {n} units exposed",
            x.iter().filter(|&&v| v == 1.0).count()
        );

        Replicate::from_columns(id, z1, z2, z3, x, y)
    }

    /// Draw `replicates` independent replicates of `units_per_replicate` units
    ///
    /// One seed per replicate is taken from `rng` in order, and replicates are
    /// then drawn in parallel from their own seeded generators.
    pub fn generate_population(
        &self,
        replicates: usize,
        units_per_replicate: usize,
        rng: &mut StdRng,
    ) -> Result<Population> {
        let start = Instant::now();
        if u32::try_from(replicates).is_err() {
            return Err(SimulationError::validation(format!(
                "Too many replicates requested: {replicates}"
            )));
        }

        let seeds: Vec<u64> = (0..replicates).map(|_| rng.random::<u64>()).collect();
        let drawn = seeds
            .into_par_iter()
            .enumerate()
            .map(|(i, seed)| {
                let mut local = StdRng::seed_from_u64(seed);
                // Bounded by the u32 check above
                self.generate_replicate(i as u32, units_per_replicate, &mut local)
            })
            .collect::<Result<Vec<_>>>()?;

        let population = Population::new(drawn)?;
        info!(
            "Generated {} replicates of {} units in {:.2?}",
            population.len(),
            units_per_replicate,
            start.elapsed()
        );
        Ok(population)
    }
}

#[inline]
fn indicator(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}
