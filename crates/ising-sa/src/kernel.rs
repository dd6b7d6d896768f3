use std::collections::BTreeMap;

use ising_core::{
    BinaryQuadraticModel, IsingError, RngHandle, SampleParams, SampleSet, Sampler, Variable,
};
use serde_json::json;
use tracing::debug;

use crate::config::SaConfig;
use crate::determinism;
use crate::schedule;

/// Index-based view of a model used by the sweep loop.
struct CompactModel {
    variables: Vec<Variable>,
    linear: Vec<f64>,
    neighbours: Vec<Vec<(usize, f64)>>,
}

impl CompactModel {
    fn new(bqm: &BinaryQuadraticModel) -> Self {
        let variables = bqm.variables();
        let index: BTreeMap<Variable, usize> = variables
            .iter()
            .enumerate()
            .map(|(idx, &v)| (v, idx))
            .collect();
        let linear = variables.iter().map(|&v| bqm.linear_bias(v)).collect();
        let mut neighbours = vec![Vec::new(); variables.len()];
        for (&(u, v), &bias) in bqm.quadratic() {
            let (iu, iv) = (index[&u], index[&v]);
            neighbours[iu].push((iv, bias));
            neighbours[iv].push((iu, bias));
        }
        Self {
            variables,
            linear,
            neighbours,
        }
    }

    /// Energy change caused by flipping spin `i`.
    fn flip_delta(&self, spins: &[i8], i: usize) -> f64 {
        let local = self.neighbours[i]
            .iter()
            .fold(self.linear[i], |acc, &(j, bias)| acc + bias * f64::from(spins[j]));
        -2.0 * f64::from(spins[i]) * local
    }
}

/// Runs one anneal from a random start and returns the final spins.
fn anneal_read(model: &CompactModel, betas: &[f64], rng: &mut RngHandle) -> Vec<i8> {
    let mut spins: Vec<i8> = (0..model.variables.len()).map(|_| rng.spin()).collect();
    for &beta in betas {
        for i in 0..spins.len() {
            let delta = model.flip_delta(&spins, i);
            if delta <= 0.0 || rng.unit() < (-beta * delta).exp() {
                spins[i] = -spins[i];
            }
        }
    }
    spins
}

/// Anneals `bqm` according to `config` with the given master seed.
///
/// Produces one record per read, in read order, without aggregation.
pub fn anneal(
    bqm: &BinaryQuadraticModel,
    config: &SaConfig,
    seed: u64,
) -> Result<SampleSet, IsingError> {
    config.validate()?;
    let model = CompactModel::new(bqm);
    let beta_range = config
        .beta_range
        .unwrap_or_else(|| schedule::default_beta_range(bqm));
    let betas = schedule::build_schedule(beta_range, config.num_sweeps, config.beta_schedule);
    debug!(
        variables = model.variables.len(),
        reads = config.num_reads,
        hot = beta_range[0],
        cold = beta_range[1],
        "annealing"
    );

    let samples: Vec<Vec<i8>> = (0..config.num_reads)
        .map(|read| {
            let mut rng = RngHandle::from_seed(determinism::read_seed(seed, read));
            anneal_read(&model, &betas, &mut rng)
        })
        .collect();

    Ok(SampleSet::from_samples(bqm, model.variables.clone(), samples)?
        .with_info("beta_range", json!(beta_range))
        .with_info("beta_schedule_type", json!(config.beta_schedule.as_str()))
        .with_info("seed", json!(seed)))
}

/// Local simulated annealing backend.
#[derive(Debug, Clone, Default)]
pub struct SimulatedAnnealingSampler {
    config: SaConfig,
}

impl SimulatedAnnealingSampler {
    /// Creates a sampler with the given base configuration.
    pub fn new(config: SaConfig) -> Self {
        Self { config }
    }

    /// Base configuration; per-call parameters override reads and seed.
    pub fn config(&self) -> &SaConfig {
        &self.config
    }
}

impl Sampler for SimulatedAnnealingSampler {
    fn name(&self) -> &str {
        "neal"
    }

    fn sample(
        &self,
        bqm: &BinaryQuadraticModel,
        params: &SampleParams,
    ) -> Result<SampleSet, IsingError> {
        let mut config = self.config.clone();
        config.num_reads = params.num_reads;
        let seed = params
            .seed
            .or(self.config.seed)
            .unwrap_or_else(rand::random::<u64>);
        anneal(bqm, &config, seed)
    }
}
