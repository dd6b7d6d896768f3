//! Sampler contract shared by the local and remote backends.

use serde::{Deserialize, Serialize};

use crate::errors::IsingError;
use crate::model::BinaryQuadraticModel;
use crate::sampleset::SampleSet;
use crate::{CouplingSpec, FieldSpec};

/// Per-call sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleParams {
    /// Number of independent reads to draw.
    pub num_reads: usize,
    /// Free-text job label forwarded to backends that record one.
    #[serde(default)]
    pub label: Option<String>,
    /// Master seed for backends with local randomness.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SampleParams {
    /// Parameters requesting `num_reads` reads and nothing else.
    pub fn reads(num_reads: usize) -> Self {
        Self {
            num_reads,
            label: None,
            seed: None,
        }
    }

    /// Sets the job label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// A backend able to draw spin samples from a binary quadratic model.
pub trait Sampler {
    /// Short backend name used in logs and reports.
    fn name(&self) -> &str;

    /// Samples the model.
    fn sample(
        &self,
        bqm: &BinaryQuadraticModel,
        params: &SampleParams,
    ) -> Result<SampleSet, IsingError>;

    /// Samples the Ising problem `(h, J)` with zero offset.
    fn sample_ising(
        &self,
        h: &FieldSpec,
        j: &CouplingSpec,
        params: &SampleParams,
    ) -> Result<SampleSet, IsingError> {
        let bqm = BinaryQuadraticModel::from_ising(h, j, 0.0)?;
        self.sample(&bqm, params)
    }
}

impl<S: Sampler + ?Sized> Sampler for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn sample(
        &self,
        bqm: &BinaryQuadraticModel,
        params: &SampleParams,
    ) -> Result<SampleSet, IsingError> {
        (**self).sample(bqm, params)
    }
}
