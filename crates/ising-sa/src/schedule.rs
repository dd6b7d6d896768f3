use ising_core::BinaryQuadraticModel;

use crate::config::BetaSchedule;

/// Range used when every bias in the model is zero.
pub const FLAT_BETA_RANGE: [f64; 2] = [0.1, 1.0];

/// Picks `[hot, cold]` inverse temperatures from the model's biases.
///
/// The hottest beta gives the least likely single flip (largest summed
/// absolute bias on one variable) a 50% acceptance; the coldest gives the
/// smallest nonzero bias a 1% acceptance.
pub fn default_beta_range(bqm: &BinaryQuadraticModel) -> [f64; 2] {
    let min_delta_energy = bqm
        .linear()
        .values()
        .chain(bqm.quadratic().values())
        .map(|bias| bias.abs())
        .filter(|&bias| bias > 0.0)
        .fold(f64::INFINITY, f64::min);
    if !min_delta_energy.is_finite() {
        return FLAT_BETA_RANGE;
    }

    let mut per_variable = bqm.linear().clone();
    for value in per_variable.values_mut() {
        *value = value.abs();
    }
    for (&(u, v), &bias) in bqm.quadratic() {
        *per_variable.entry(u).or_insert(0.0) += bias.abs();
        *per_variable.entry(v).or_insert(0.0) += bias.abs();
    }
    let max_delta_energy = per_variable.values().copied().fold(0.0, f64::max);

    let hot = 2f64.ln() / max_delta_energy;
    let cold = 100f64.ln() / min_delta_energy;
    [hot, cold]
}

/// Expands a beta range into one beta per sweep.
pub fn build_schedule(range: [f64; 2], num_sweeps: usize, kind: BetaSchedule) -> Vec<f64> {
    let [hot, cold] = range;
    if num_sweeps <= 1 {
        return vec![hot; num_sweeps];
    }
    let last = (num_sweeps - 1) as f64;
    (0..num_sweeps)
        .map(|step| {
            let t = step as f64 / last;
            match kind {
                BetaSchedule::Geometric => hot * (cold / hot).powf(t),
                BetaSchedule::Linear => hot + (cold - hot) * t,
            }
        })
        .collect()
}
