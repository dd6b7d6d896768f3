use ising_core::{
    BinaryQuadraticModel, CouplingSpec, FieldSpec, IsingError, SampleParams, SampleSet, Sampler,
};
use tracing::info;

/// Reads drawn from the local annealer per call.
pub const LOCAL_READS: usize = 10;
/// Reads requested from the remote annealer per call.
pub const REMOTE_READS: usize = 5000;
/// Job label attached to remote submissions.
pub const DEFAULT_LABEL: &str = "ising-sim";

/// Samples `(h, J)` with zero offset on the local annealer.
pub fn sim_anneal(
    sampler: &dyn Sampler,
    h: &FieldSpec,
    j: &CouplingSpec,
    num_reads: usize,
    seed: Option<u64>,
) -> Result<SampleSet, IsingError> {
    let mut params = SampleParams::reads(num_reads);
    params.seed = seed;
    sampler.sample_ising(h, j, &params)
}

/// Samples `(h, J, offset)` on the remote annealer.
///
/// Every call spends device time.
pub fn dwave_sample(
    sampler: &dyn Sampler,
    h: &FieldSpec,
    j: &CouplingSpec,
    offset: f64,
    num_reads: usize,
    label: &str,
) -> Result<SampleSet, IsingError> {
    let bqm = BinaryQuadraticModel::from_ising(h, j, offset)?;
    info!(
        backend = sampler.name(),
        reads = num_reads,
        label,
        "submitting to remote annealer"
    );
    sampler.sample(&bqm, &SampleParams::reads(num_reads).with_label(label))
}
