//! Orchestration of a Monte Carlo run

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Instant;

use crate::config::SimulationConfig;
use crate::data::{Population, PopulationGenerator};
use crate::error::{Result, SimulationError};
use crate::models::{IrlsConfig, Link};
use crate::report::SimulationReport;
use crate::simulation::parallel::evaluate_parallel;
use crate::simulation::scenario::{Scenario, standard_scenarios};
use crate::simulation::sequential::evaluate_sequential;

/// Generates the population and evaluates scenarios on it
#[derive(Debug, Clone)]
pub struct SimulationRunner {
    config: SimulationConfig,
    irls: IrlsConfig,
}

impl SimulationRunner {
    // Below this many replicates the pool overhead is not worth it
    const PARALLEL_THRESHOLD: usize = 16;

    /// Create a runner with default IRLS settings
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            irls: IrlsConfig::default(),
        }
    }

    /// Draw the population from the configured seed
    pub fn generate_population(&self) -> Result<Population> {
        let generator = PopulationGenerator::new(self.config.generative_model())?;
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        generator.generate_population(
            self.config.replicates,
            self.config.units_per_replicate,
            &mut rng,
        )
    }

    /// The standard scenarios, with logistic outcome models for a binary outcome
    #[must_use]
    pub fn scenarios(&self) -> Vec<Scenario> {
        let scenarios = standard_scenarios();
        if self.config.binary_outcome {
            scenarios
                .into_iter()
                .map(|s| s.with_outcome_link(Link::Logit))
                .collect()
        } else {
            scenarios
        }
    }

    /// Evaluate one scenario on every replicate and aggregate
    pub fn run_scenario(
        &self,
        population: &Population,
        scenario: &Scenario,
    ) -> Result<SimulationReport> {
        if population.is_empty() {
            return Err(SimulationError::validation(
                "Cannot run a scenario on an empty population",
            ));
        }
        let start = Instant::now();
        info!("Running {scenario}");

        let use_parallel =
            self.config.use_parallel && population.len() >= Self::PARALLEL_THRESHOLD;
        let estimates = if use_parallel {
            evaluate_parallel(
                population.replicates(),
                scenario,
                &self.irls,
                self.config.show_progress,
            )?
        } else {
            evaluate_sequential(
                population.replicates(),
                scenario,
                &self.irls,
                self.config.show_progress,
            )?
        };

        let report = SimulationReport::new(scenario, population.units_per_replicate(), estimates)?;
        info!(
            "{} complete: {} replicates in {:.2?}",
            scenario.name,
            report.replicates(),
            start.elapsed()
        );
        Ok(report)
    }

    /// Evaluate several scenarios on the same population
    pub fn run_all(
        &self,
        population: &Population,
        scenarios: &[Scenario],
    ) -> Result<Vec<SimulationReport>> {
        scenarios
            .iter()
            .map(|scenario| self.run_scenario(population, scenario))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_and_sequential_agree() {
        let mut config = SimulationConfig::quick(300, 20, 42);
        let population = SimulationRunner::new(config.clone())
            .generate_population()
            .unwrap();
        let scenario = &standard_scenarios()[0];

        config.use_parallel = true;
        let parallel = SimulationRunner::new(config.clone())
            .run_scenario(&population, scenario)
            .unwrap();
        config.use_parallel = false;
        let sequential = SimulationRunner::new(config)
            .run_scenario(&population, scenario)
            .unwrap();

        assert_eq!(parallel.estimates(), sequential.estimates());
    }

    #[test]
    fn test_population_is_seeded() {
        let config = SimulationConfig::quick(50, 3, 11);
        let a = SimulationRunner::new(config.clone()).generate_population().unwrap();
        let b = SimulationRunner::new(config).generate_population().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.units_per_replicate(), 50);
    }

    #[test]
    fn test_binary_outcome_uses_logit_outcome_models() {
        let mut config = SimulationConfig::quick(400, 2, 3);
        config.binary_outcome = true;
        let runner = SimulationRunner::new(config);
        assert!(
            runner
                .scenarios()
                .iter()
                .all(|s| s.outcome_model.link == Link::Logit)
        );

        let population = runner.generate_population().unwrap();
        let reports = runner.run_all(&population, &runner.scenarios()).unwrap();
        assert_eq!(reports.len(), 4);
        // Risk differences are bounded by one
        assert!(
            reports
                .iter()
                .flat_map(|r| r.estimates())
                .all(|e| e.g_bias.abs() <= 1.0)
        );
    }
}
