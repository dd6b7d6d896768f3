use ising_core::{BinaryQuadraticModel, CouplingSpec, FieldSpec};
use ising_sa::schedule::FLAT_BETA_RANGE;
use ising_sa::{build_schedule, default_beta_range, BetaSchedule};
use proptest::prelude::*;

#[test]
fn chain_range_follows_flip_probabilities() {
    let h: FieldSpec = [(0, 0.0), (1, 0.0), (2, 0.0)].into_iter().collect();
    let j: CouplingSpec = [((0, 1), 1.0), ((1, 2), 1.0)].into_iter().collect();
    let bqm = BinaryQuadraticModel::from_ising(&h, &j, 0.0).unwrap();
    let [hot, cold] = default_beta_range(&bqm);
    assert!((hot - 2f64.ln() / 2.0).abs() < 1e-12);
    assert!((cold - 100f64.ln()).abs() < 1e-12);
}

#[test]
fn flat_model_uses_fallback_range() {
    let h: FieldSpec = [(0, 0.0), (1, 0.0)].into_iter().collect();
    let bqm = BinaryQuadraticModel::from_ising(&h, &CouplingSpec::new(), 0.0).unwrap();
    assert_eq!(default_beta_range(&bqm), FLAT_BETA_RANGE);
}

#[test]
fn degenerate_schedule_lengths() {
    assert!(build_schedule([0.1, 1.0], 0, BetaSchedule::Geometric).is_empty());
    assert_eq!(build_schedule([0.1, 1.0], 1, BetaSchedule::Linear), vec![0.1]);
}

proptest! {
    #[test]
    fn schedules_hit_endpoints_monotonically(
        hot in 0.01f64..1.0,
        span in 1.0f64..50.0,
        sweeps in 2usize..300,
        geometric in any::<bool>(),
    ) {
        let cold = hot * span;
        let kind = if geometric { BetaSchedule::Geometric } else { BetaSchedule::Linear };
        let betas = build_schedule([hot, cold], sweeps, kind);
        prop_assert_eq!(betas.len(), sweeps);
        prop_assert!((betas[0] - hot).abs() < 1e-9 * cold);
        prop_assert!((betas[sweeps - 1] - cold).abs() < 1e-9 * cold);
        for pair in betas.windows(2) {
            prop_assert!(pair[1] >= pair[0] - 1e-12);
        }
    }
}
