#![deny(missing_docs)]

//! Field sweep orchestration for the three-node Ising chain.

mod adapters;
mod canonical;
mod driver;
mod hash;
mod output;
mod plan;
mod problem;

pub use adapters::{dwave_sample, sim_anneal, DEFAULT_LABEL, LOCAL_READS, REMOTE_READS};
pub use canonical::{from_json_slice, to_canonical_json_bytes};
pub use driver::{run_single, run_sweep, SweepJobReport, SweepReport, REPORT_FILE};
pub use hash::stable_hash_string;
pub use output::{clear_results, render, result_path, write_sample_set, Backend, TableFormat};
pub use plan::{RemotePlan, RunPlan};
pub use problem::{
    chain_couplings, sweep_fields, uniform_field, zero_field, FIELD_SWEEP, NODES, OFFSET,
};
