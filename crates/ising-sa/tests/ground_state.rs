use ising_core::{BinaryQuadraticModel, CouplingSpec, FieldSpec, SampleParams, Sampler};
use ising_sa::{SaConfig, SimulatedAnnealingSampler};

fn chain_problem(field: f64) -> (FieldSpec, CouplingSpec) {
    let h: FieldSpec = [(0, field), (1, field), (2, field)].into_iter().collect();
    let j: CouplingSpec = [((0, 1), 1.0), ((1, 2), 1.0)].into_iter().collect();
    (h, j)
}

#[test]
fn zero_field_chain_anneals_to_alternating_spins() {
    let (h, j) = chain_problem(0.0);
    let sampler = SimulatedAnnealingSampler::default();
    let set = sampler
        .sample_ising(&h, &j, &SampleParams::reads(10).with_seed(2022))
        .unwrap();

    assert_eq!(set.len(), 10);
    assert_eq!(set.variables(), &[0, 1, 2]);
    let best = set.lowest().unwrap();
    assert_eq!(best.energy, -2.0);
    assert!(best.sample == vec![1, -1, 1] || best.sample == vec![-1, 1, -1]);
}

#[test]
fn positive_field_selects_down_majority_ground_state() {
    let (h, j) = chain_problem(0.5);
    let bqm = BinaryQuadraticModel::from_ising(&h, &j, 0.0).unwrap();
    let sampler = SimulatedAnnealingSampler::default();
    let set = sampler
        .sample(&bqm, &SampleParams::reads(20).with_seed(7))
        .unwrap();
    let best = set.lowest().unwrap();
    assert_eq!(best.sample, vec![-1, 1, -1]);
    assert!((best.energy - (-2.5)).abs() < 1e-12);
}

#[test]
fn per_call_reads_override_config() {
    let (h, j) = chain_problem(0.0);
    let sampler = SimulatedAnnealingSampler::new(SaConfig {
        num_reads: 3,
        num_sweeps: 50,
        ..SaConfig::default()
    });
    let set = sampler
        .sample_ising(&h, &j, &SampleParams::reads(4).with_seed(1))
        .unwrap();
    assert_eq!(set.len(), 4);
    assert_eq!(set.total_reads(), 4);
}

#[test]
fn metadata_records_schedule_and_seed() {
    let (h, j) = chain_problem(0.0);
    let set = SimulatedAnnealingSampler::default()
        .sample_ising(&h, &j, &SampleParams::reads(2).with_seed(11))
        .unwrap();
    assert_eq!(set.info()["beta_schedule_type"], "geometric");
    assert_eq!(set.info()["seed"], 11);
    assert!(set.info()["beta_range"].is_array());
}

#[test]
fn zero_reads_is_rejected() {
    let (h, j) = chain_problem(0.0);
    let err = SimulatedAnnealingSampler::default()
        .sample_ising(&h, &j, &SampleParams::reads(0))
        .unwrap_err();
    assert_eq!(err.info().code, "num-reads");
}
