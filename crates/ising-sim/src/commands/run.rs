use std::error::Error;

use clap::Args;
use ising_core::Sampler;
use ising_exp::run_single;

use super::{local_sampler, remote_sampler, PlanArgs};

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub common: PlanArgs,
}

pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let plan = args.common.load()?;
    let local = local_sampler(&plan);
    let remote = remote_sampler(&plan)?;
    let files = run_single(&plan, &local, remote.as_ref().map(|s| s as &dyn Sampler))?;
    for file in files {
        println!("{}", file.display());
    }
    Ok(())
}
