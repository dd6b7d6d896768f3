use std::error::Error;

use clap::Args;
use ising_core::Sampler;
use ising_exp::{run_sweep, REPORT_FILE};

use super::{local_sampler, remote_sampler, PlanArgs};

#[derive(Args, Debug)]
pub struct SweepArgs {
    #[command(flatten)]
    pub common: PlanArgs,
    /// Master seed for the local annealer; overrides the plan.
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: &SweepArgs) -> Result<(), Box<dyn Error>> {
    let mut plan = args.common.load()?;
    if args.seed.is_some() {
        plan.seed = args.seed;
    }
    let local = local_sampler(&plan);
    let remote = remote_sampler(&plan)?;
    let report = run_sweep(&plan, &local, remote.as_ref().map(|s| s as &dyn Sampler))?;
    for job in &report.jobs {
        println!("{:>2}  h={:<8} {}", job.index, job.field, job.files.join(" "));
    }
    println!("{}", plan.out_dir.join(REPORT_FILE).display());
    Ok(())
}
