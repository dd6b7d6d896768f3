#![deny(missing_docs)]

//! Simulated annealing sampler for spin-valued quadratic models.
//!
//! Each read starts from uniformly random spins and performs one in-order
//! Metropolis sweep per beta of a geometric or linear schedule.

/// YAML configuration schema and defaults.
pub mod config;
/// Deterministic seed derivation helpers.
pub mod determinism;
/// Sweep loop and the `Sampler` implementation.
pub mod kernel;
/// Beta range heuristics and schedule construction.
pub mod schedule;

pub use config::{BetaSchedule, SaConfig};
pub use kernel::{anneal, SimulatedAnnealingSampler};
pub use schedule::{build_schedule, default_beta_range};
