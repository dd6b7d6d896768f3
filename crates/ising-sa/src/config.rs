use ising_core::{ErrorInfo, IsingError};
use serde::{Deserialize, Serialize};

/// YAML-configurable parameters of the simulated annealing sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaConfig {
    /// Number of independent anneals, one sample each.
    #[serde(default = "default_num_reads")]
    pub num_reads: usize,
    /// Number of sweeps (and beta values) per anneal.
    #[serde(default = "default_num_sweeps")]
    pub num_sweeps: usize,
    /// Explicit `[hot, cold]` inverse temperatures; derived from the model when unset.
    #[serde(default)]
    pub beta_range: Option<[f64; 2]>,
    /// Interpolation between the hot and cold beta.
    #[serde(default)]
    pub beta_schedule: BetaSchedule,
    /// Master seed; a random one is drawn and reported when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_num_reads() -> usize {
    10
}

fn default_num_sweeps() -> usize {
    1000
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            num_reads: default_num_reads(),
            num_sweeps: default_num_sweeps(),
            beta_range: None,
            beta_schedule: BetaSchedule::default(),
            seed: None,
        }
    }
}

/// Supported beta interpolation schedules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BetaSchedule {
    /// Geometric spacing between hot and cold beta.
    #[default]
    Geometric,
    /// Linear spacing between hot and cold beta.
    Linear,
}

impl BetaSchedule {
    /// Name recorded in sample set metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            BetaSchedule::Geometric => "geometric",
            BetaSchedule::Linear => "linear",
        }
    }
}

impl SaConfig {
    /// Rejects configurations the kernel cannot run.
    pub fn validate(&self) -> Result<(), IsingError> {
        if self.num_reads == 0 {
            return Err(config_error("num-reads", "num_reads must be positive"));
        }
        if self.num_sweeps == 0 {
            return Err(config_error("num-sweeps", "num_sweeps must be positive"));
        }
        if let Some([hot, cold]) = self.beta_range {
            if !(hot > 0.0 && cold > 0.0) || !hot.is_finite() || !cold.is_finite() {
                return Err(IsingError::Sampler(
                    ErrorInfo::new("beta-range", "beta range must be positive and finite")
                        .with_context("hot", hot.to_string())
                        .with_context("cold", cold.to_string()),
                ));
            }
        }
        Ok(())
    }
}

fn config_error(code: &str, message: &str) -> IsingError {
    IsingError::Sampler(ErrorInfo::new(code, message))
}
