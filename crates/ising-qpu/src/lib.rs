#![deny(missing_docs)]

//! Remote quantum annealer backend.
//!
//! [`DWaveSampler`] talks to the solver API over blocking HTTP and samples
//! models already laid out on its qubits. [`EmbeddingComposite`] places a
//! logical model onto that hardware graph first, so callers can hand it the
//! same model they give the local annealer.

pub mod client;
/// Credentials and connection settings.
pub mod config;
pub mod composite;
pub mod embedding;
pub mod qp;
/// Structured solver seam and the remote implementation.
pub mod solver;
pub mod wire;

pub use client::SapiClient;
pub use composite::EmbeddingComposite;
pub use config::SapiConfig;
pub use embedding::{find_direct_embedding, Embedding, TargetGraph};
pub use solver::{DWaveSampler, StructuredSolver};
pub use wire::{SolverInfo, SolverProperties};

/// The remote sampler as used by the experiment driver.
pub type RemoteSampler = EmbeddingComposite<DWaveSampler>;

