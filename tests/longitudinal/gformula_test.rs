use causal_sim::IrlsConfig;
use causal_sim::longitudinal::{
    LongitudinalModel, ParametricGFormula, TreatmentRegime, tree_positions, write_positions_csv,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::utils::scratch_dir;

#[test]
fn test_demonstration_run() {
    let mut rng = StdRng::seed_from_u64(1986);
    let observed = LongitudinalModel::default().generate(200, &mut rng).unwrap();
    let gformula = ParametricGFormula::fit(&observed, &IrlsConfig::default()).unwrap();

    let (always, never, difference) = gformula
        .risk_difference(
            &observed,
            TreatmentRegime::ALWAYS,
            TreatmentRegime::NEVER,
            &mut rng,
        )
        .unwrap();

    assert_eq!(always.sample.len(), 1000);
    assert_eq!(never.sample.count_following(false, false), 1000);
    assert!((difference - (always.risk - never.risk)).abs() < 1e-15);
    assert!(difference.abs() < 1.0);
}

#[test]
fn test_positions_file() {
    let dir = scratch_dir("stg");
    let observed = LongitudinalModel::default()
        .generate(25, &mut StdRng::seed_from_u64(3))
        .unwrap();
    let path = dir.join("stg.csv");
    write_positions_csv(&path, &observed).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "id,pos0,pos1,pos2,pos3,pos4,pos5");
    assert_eq!(lines.len(), 26);

    let first: Vec<f64> = lines[1]
        .split(',')
        .skip(1)
        .map(|v| v.parse().unwrap())
        .collect();
    assert_eq!(first.as_slice(), tree_positions(observed.path(0)).as_slice());

    std::fs::remove_dir_all(&dir).unwrap();
}
