pub mod run;
pub mod solvers;
pub mod sweep;
pub mod version;

use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use ising_exp::RunPlan;
use ising_qpu::{EmbeddingComposite, RemoteSampler, SapiConfig};
use ising_sa::SimulatedAnnealingSampler;
use tracing::info;

/// Flags shared by `run` and `sweep`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// YAML plan overriding the built-in defaults.
    #[arg(long)]
    pub plan: Option<PathBuf>,
    /// Output directory; overrides the plan.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Skip the remote annealer (no device time is used).
    #[arg(long)]
    pub local_only: bool,
}

impl PlanArgs {
    pub fn load(&self) -> Result<RunPlan, Box<dyn Error>> {
        let mut plan = match &self.plan {
            Some(path) => RunPlan::from_yaml_file(path)?,
            None => RunPlan::default(),
        };
        if let Some(out) = &self.out {
            plan.out_dir = out.clone();
        }
        if self.local_only {
            plan = plan.local_only();
        }
        Ok(plan)
    }
}

pub fn local_sampler(plan: &RunPlan) -> SimulatedAnnealingSampler {
    SimulatedAnnealingSampler::new(plan.annealer_config())
}

/// Connects to the remote annealer when the plan enables it.
pub fn remote_sampler(plan: &RunPlan) -> Result<Option<RemoteSampler>, Box<dyn Error>> {
    if !plan.uses(ising_exp::Backend::Dwave) {
        info!("remote backend disabled");
        return Ok(None);
    }
    let config = plan.remote.apply(SapiConfig::from_env()?);
    let sampler = ising_qpu::DWaveSampler::connect(&config)?;
    Ok(Some(
        EmbeddingComposite::new(sampler).with_search_budget(plan.remote.search_budget),
    ))
}
