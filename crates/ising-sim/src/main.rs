use std::error::Error;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{
    run::{self, RunArgs},
    solvers::{self, SolversArgs},
    sweep::{self, SweepArgs},
    version::{self, VersionArgs},
};

#[derive(Parser, Debug)]
#[command(name = "ising-sim", about = "Three-node Ising chain on local and remote annealers")]
struct Cli {
    /// Log filter in EnvFilter syntax, e.g. `info` or `ising_qpu=debug`.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample the zero-field chain once on each backend.
    Run(RunArgs),
    /// Sweep the field strength and write one result pair per value.
    Sweep(SweepArgs),
    /// List solvers visible to the configured token.
    Solvers(SolversArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Command::Run(args) => run::run(&args),
        Command::Sweep(args) => sweep::run(&args),
        Command::Solvers(args) => solvers::run(&args),
        Command::Version(args) => version::run(&args),
    }
}
