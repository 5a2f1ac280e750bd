use std::fs;
use std::time::Instant;

use anyhow::Context;
use causal_sim::utils::logging::progress;
use causal_sim::{SimulationConfig, SimulationRunner, write_population, write_scenario_outputs};
use log::info;

#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimulationConfig::from_env();
    info!("\n{config}");

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads.max(1))
        .build_global()
        .context("Failed to configure the rayon thread pool")?;

    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    let start = Instant::now();
    let runner = SimulationRunner::new(config.clone());

    let spinner = progress::create_spinner(Some("Generating population"), config.show_progress);
    let population = runner
        .generate_population()
        .context("Failed to generate the synthetic population")?;
    progress::finish_progress_bar(&spinner, Some("Population generated"));

    if config.write_dataset {
        let path = config.output_dir.join("population.parquet");
        write_population(&path, &population)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    for scenario in runner.scenarios() {
        let report = runner
            .run_scenario(&population, &scenario)
            .with_context(|| format!("Failed to evaluate {}", scenario.name))?;

        println!("{}", scenario.name.to_uppercase());
        println!("{report}");

        let outputs = write_scenario_outputs(
            &report,
            &config.output_dir,
            &scenario.slug(),
            config.write_plots,
        )
        .with_context(|| format!("Failed to write outputs for {}", scenario.name))?;
        info!(
            "{} outputs: {}, {}{}",
            scenario.name,
            outputs.estimates_csv.display(),
            outputs.summary_json.display(),
            outputs
                .plot
                .map(|svg| format!(", {}", svg.display()))
                .unwrap_or_default()
        );
    }

    info!("Simulation finished in {:.2?}", start.elapsed());
    Ok(())
}
