use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ising_core::{ErrorInfo, IsingError};
use ising_qpu::SapiConfig;
use ising_sa::SaConfig;
use serde::{Deserialize, Serialize};

use crate::adapters::{DEFAULT_LABEL, LOCAL_READS, REMOTE_READS};
use crate::output::{Backend, TableFormat};
use crate::problem::{FIELD_SWEEP, OFFSET};

/// Everything a run or sweep needs besides credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunPlan {
    /// Field strengths visited by `sweep`, in order.
    #[serde(default = "RunPlan::default_field_values")]
    pub field_values: Vec<f64>,
    /// Reads per local annealer call.
    #[serde(default = "RunPlan::default_local_reads")]
    pub local_reads: usize,
    /// Reads per remote submission.
    #[serde(default = "RunPlan::default_remote_reads")]
    pub remote_reads: usize,
    /// Label attached to remote jobs.
    #[serde(default = "RunPlan::default_label")]
    pub label: String,
    /// Constant energy term of the remote model.
    #[serde(default = "RunPlan::default_offset")]
    pub offset: f64,
    /// Directory receiving result files and the report.
    #[serde(default = "RunPlan::default_out_dir")]
    pub out_dir: PathBuf,
    /// Result file extension; `*.<ext>` files are cleared before a sweep.
    #[serde(default = "RunPlan::default_extension")]
    pub extension: String,
    /// Layout of result files.
    #[serde(default)]
    pub format: TableFormat,
    /// Master seed for the local annealer.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Enabled backends.
    #[serde(default = "RunPlan::default_backends")]
    pub backends: Vec<Backend>,
    /// Local annealer settings; `num_reads` here is overridden by `local_reads`.
    #[serde(default)]
    pub annealer: SaConfig,
    /// Remote backend settings.
    #[serde(default)]
    pub remote: RemotePlan,
}

impl RunPlan {
    fn default_field_values() -> Vec<f64> {
        FIELD_SWEEP.to_vec()
    }

    const fn default_local_reads() -> usize {
        LOCAL_READS
    }

    const fn default_remote_reads() -> usize {
        REMOTE_READS
    }

    fn default_label() -> String {
        DEFAULT_LABEL.to_string()
    }

    const fn default_offset() -> f64 {
        OFFSET
    }

    fn default_out_dir() -> PathBuf {
        PathBuf::from("results")
    }

    fn default_extension() -> String {
        "txt".to_string()
    }

    fn default_backends() -> Vec<Backend> {
        vec![Backend::Neal, Backend::Dwave]
    }

    /// Loads a YAML plan; absent keys take their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, IsingError> {
        let text = fs::read_to_string(path).map_err(|err| IsingError::io("plan-read", err, path))?;
        Self::from_yaml_str(&text).map_err(|err| match err {
            IsingError::Config(info) => {
                IsingError::Config(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }

    /// Parses and validates a YAML plan.
    pub fn from_yaml_str(text: &str) -> Result<Self, IsingError> {
        let plan: RunPlan = serde_yaml::from_str(text)
            .map_err(|err| IsingError::Config(ErrorInfo::new("plan-parse", err.to_string())))?;
        plan.validate()?;
        Ok(plan)
    }

    /// Rejects plans that could not produce any output or would clobber the report.
    pub fn validate(&self) -> Result<(), IsingError> {
        let extension = self.extension.trim_start_matches('.');
        let reserved = &['/', '\\', '*', '?', '{', '}', '[', ']'][..];
        if extension.is_empty() || extension.contains(reserved) {
            return Err(IsingError::Config(
                ErrorInfo::new("extension", "result extension must be a plain suffix")
                    .with_context("extension", self.extension.clone()),
            ));
        }
        if extension.eq_ignore_ascii_case("json") {
            return Err(IsingError::Config(
                ErrorInfo::new("extension", "json is reserved for the sweep report")
                    .with_hint("use txt or csv"),
            ));
        }
        if self.backends.is_empty() {
            return Err(IsingError::Config(ErrorInfo::new(
                "backends",
                "at least one backend must be enabled",
            )));
        }
        if self.local_reads == 0 || self.remote_reads == 0 {
            return Err(IsingError::Config(ErrorInfo::new(
                "num-reads",
                "read counts must be positive",
            )));
        }
        Ok(())
    }

    /// Extension without a leading dot.
    pub fn extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }

    /// Whether `backend` is enabled.
    pub fn uses(&self, backend: Backend) -> bool {
        self.backends.contains(&backend)
    }

    /// Drops the remote backend.
    pub fn local_only(mut self) -> Self {
        self.backends.retain(|&backend| backend != Backend::Dwave);
        self
    }

    /// Local annealer configuration with the plan's read count and seed applied.
    pub fn annealer_config(&self) -> SaConfig {
        SaConfig {
            num_reads: self.local_reads,
            seed: self.seed.or(self.annealer.seed),
            ..self.annealer.clone()
        }
    }
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            field_values: Self::default_field_values(),
            local_reads: Self::default_local_reads(),
            remote_reads: Self::default_remote_reads(),
            label: Self::default_label(),
            offset: Self::default_offset(),
            out_dir: Self::default_out_dir(),
            extension: Self::default_extension(),
            format: TableFormat::default(),
            seed: None,
            backends: Self::default_backends(),
            annealer: SaConfig::default(),
            remote: RemotePlan::default(),
        }
    }
}

/// Remote backend settings layered over the environment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePlan {
    /// Solver id; overrides the environment.
    #[serde(default)]
    pub solver: Option<String>,
    /// Delay between status polls.
    #[serde(default = "RemotePlan::default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Upper bound on polling time; unbounded when unset.
    #[serde(default)]
    pub max_wait_secs: Option<u64>,
    /// Placement attempts before the embedding search gives up.
    #[serde(default = "RemotePlan::default_search_budget")]
    pub search_budget: usize,
}

impl RemotePlan {
    const fn default_poll_interval_ms() -> u64 {
        1000
    }

    const fn default_search_budget() -> usize {
        ising_qpu::embedding::DEFAULT_SEARCH_BUDGET
    }

    /// Applies the plan's solver and polling settings to `config`.
    pub fn apply(&self, mut config: SapiConfig) -> SapiConfig {
        if let Some(solver) = &self.solver {
            config = config.with_solver(solver.clone());
        }
        config.with_polling(
            Duration::from_millis(self.poll_interval_ms),
            self.max_wait_secs.map(Duration::from_secs),
        )
    }
}

impl Default for RemotePlan {
    fn default() -> Self {
        Self {
            solver: None,
            poll_interval_ms: Self::default_poll_interval_ms(),
            max_wait_secs: None,
            search_budget: Self::default_search_budget(),
        }
    }
}
