use causal_sim::config::DEFAULT_SEED;
use causal_sim::{
    IrlsConfig, SimulationRunner, evaluate_replicate, standard_scenarios, write_bias_plot,
    write_scenario_outputs,
};

use crate::utils::{population, scratch_dir, test_config};

#[test]
fn test_correct_models_single_replicate() {
    let population = population(2000, 1, DEFAULT_SEED);
    let scenario = &standard_scenarios()[0];
    let estimate = evaluate_replicate(
        &population.replicates()[0],
        &scenario.exposure_model,
        &scenario.outcome_model,
        &IrlsConfig::default(),
    )
    .unwrap();

    assert!(estimate.g_bias.abs() < 0.1, "{estimate:?}");
    assert!(estimate.i_bias.abs() < 0.1, "{estimate:?}");
    assert!(estimate.a_bias.abs() < 0.1, "{estimate:?}");
    assert!(estimate.covered(), "{estimate:?}");
}

#[test]
fn test_correct_models_are_unbiased_with_nominal_coverage() {
    let runner = SimulationRunner::new(test_config(500, 200, 2024));
    let population = runner.generate_population().unwrap();
    let report = runner
        .run_scenario(&population, &standard_scenarios()[0])
        .unwrap();
    let summary = report.summary();

    assert_eq!(report.replicates(), 200);
    assert!(summary.g_formula.mean_bias.abs() < 0.1, "{summary:?}");
    assert!(summary.ipw.mean_bias.abs() < 0.1, "{summary:?}");
    assert!(summary.aipw.mean_bias.abs() < 0.1, "{summary:?}");
    assert!(
        (0.85..=1.0).contains(&summary.aipw_coverage),
        "{summary:?}"
    );
    // Doubly robust is no noisier than weighting alone
    assert!(summary.aipw.empirical_se <= summary.ipw.empirical_se * 1.1);
}

#[test]
fn test_coverage_is_nominal_only_under_correct_models() {
    let runner = SimulationRunner::new(test_config(2000, 200, DEFAULT_SEED));
    let population = runner.generate_population().unwrap();
    let reports = runner.run_all(&population, &standard_scenarios()).unwrap();
    assert_eq!(reports.len(), 4);

    let correct = reports[0].summary();
    assert!(
        (0.90..=0.99).contains(&correct.aipw_coverage),
        "{correct:?}"
    );

    // Z3 raises both exposure and outcome, so leaving it out of both models
    // pushes every estimator upward and the interval misses 0 more often
    let both_wrong = reports[3].summary();
    assert!(both_wrong.aipw_coverage < 0.85, "{both_wrong:?}");
    assert!(both_wrong.g_formula.mean_bias > 0.05, "{both_wrong:?}");
    assert!(both_wrong.ipw.mean_bias > 0.05, "{both_wrong:?}");
    assert!(both_wrong.aipw.mean_bias > 0.05, "{both_wrong:?}");

    // With one of the two models correct the doubly robust estimate holds
    for report in &reports[1..3] {
        let summary = report.summary();
        assert!(summary.aipw.mean_bias.abs() < 0.1, "{summary:?}");
    }
}

#[test]
fn test_outputs_are_written() {
    let dir = scratch_dir("pipeline_outputs");
    let runner = SimulationRunner::new(test_config(300, 30, 3));
    let population = runner.generate_population().unwrap();
    let scenario = &runner.scenarios()[0];
    let report = runner.run_scenario(&population, scenario).unwrap();

    let csv = dir.join(format!("{}_estimates.csv", scenario.slug()));
    report.write_estimates_csv(&csv).unwrap();
    assert_eq!(std::fs::read_to_string(&csv).unwrap().lines().count(), 31);

    let json = dir.join("summary.json");
    report.write_summary_json(&json).unwrap();
    assert!(std::fs::read_to_string(&json).unwrap().contains("aipw_coverage"));

    let svg = dir.join("scenario_1.svg");
    write_bias_plot(&report, &svg).unwrap();
    let content = std::fs::read_to_string(&svg).unwrap();
    assert!(content.contains(">G-comp</text>"));
    assert!(content.contains(">IPW</text>"));
    assert!(content.contains(">AIPW</text>"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_runs_are_reproducible() {
    let a = SimulationRunner::new(test_config(200, 20, 8));
    let b = SimulationRunner::new(test_config(200, 20, 8));
    let scenario = &standard_scenarios()[2];

    let ra = a.run_scenario(&a.generate_population().unwrap(), scenario).unwrap();
    let rb = b.run_scenario(&b.generate_population().unwrap(), scenario).unwrap();
    assert_eq!(ra.estimates(), rb.estimates());
    assert_eq!(ra.summary(), rb.summary());
}

#[test]
fn test_single_replicate_outputs_skip_the_plot() {
    let dir = scratch_dir("single_replicate");
    let mut config = test_config(500, 1, 11);
    config.write_plots = true;
    let runner = SimulationRunner::new(config);
    let population = runner.generate_population().unwrap();

    for scenario in runner.scenarios() {
        let report = runner.run_scenario(&population, &scenario).unwrap();
        let outputs = write_scenario_outputs(&report, &dir, &scenario.slug(), true).unwrap();

        assert!(outputs.plot.is_none());
        assert!(!dir.join(format!("{}.svg", scenario.slug())).exists());
        let csv = std::fs::read_to_string(&outputs.estimates_csv).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(outputs.summary_json.exists());
    }

    std::fs::remove_dir_all(&dir).unwrap();
}
