use std::error::Error;

use clap::Args;
use ising_exp::to_canonical_json_bytes;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Emit extended metadata about the backends and defaults.
    #[arg(long)]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: &'static str,
    endpoint: &'static str,
    local_backend: &'static str,
    remote_backend: &'static str,
    field_values: Vec<f64>,
}

pub fn run(args: &VersionArgs) -> Result<(), Box<dyn Error>> {
    if !args.long {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let info = VersionInfo {
        version: env!("CARGO_PKG_VERSION"),
        endpoint: ising_qpu::config::DEFAULT_ENDPOINT,
        local_backend: "neal",
        remote_backend: "dwave",
        field_values: ising_exp::FIELD_SWEEP.to_vec(),
    };
    let json = to_canonical_json_bytes(&info)?;
    println!("{}", String::from_utf8(json)?);
    Ok(())
}
