use std::error::Error;

use clap::Args;
use ising_qpu::{SapiClient, SapiConfig};

#[derive(Args, Debug)]
pub struct SolversArgs {
    /// Print the raw solver descriptions as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &SolversArgs) -> Result<(), Box<dyn Error>> {
    let config = SapiConfig::from_env()?;
    let solvers = SapiClient::new(&config)?.list_solvers()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&solvers)?);
        return Ok(());
    }
    for solver in &solvers {
        let load = solver
            .avg_load
            .map_or_else(|| "-".to_string(), |load| format!("{:.0}%", load * 100.0));
        println!(
            "{:<28} {:<8} {:<6} qubits={:<5} load={}",
            solver.id,
            solver.status.as_deref().unwrap_or("?"),
            if solver.is_qpu() { "qpu" } else { "other" },
            solver.properties.qubits.len(),
            load
        );
    }
    Ok(())
}
