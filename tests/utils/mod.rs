use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use causal_sim::{Population, SimulationConfig, SimulationRunner};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Unique scratch directory under the system temp dir
#[must_use]
pub fn scratch_dir(label: &str) -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "causal_sim_{label}_{}_{n}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("create scratch directory");
    dir
}

/// Quiet configuration for integration runs
#[must_use]
pub fn test_config(units: usize, replicates: usize, seed: u64) -> SimulationConfig {
    SimulationConfig::quick(units, replicates, seed)
}

/// Generate a population from a quiet configuration
#[must_use]
pub fn population(units: usize, replicates: usize, seed: u64) -> Population {
    SimulationRunner::new(test_config(units, replicates, seed))
        .generate_population()
        .expect("generate population")
}
