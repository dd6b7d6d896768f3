#![deny(missing_docs)]

//! Core model and sampling types for the Ising annealing workspace.
//!
//! Every backend consumes a [`BinaryQuadraticModel`] and returns a
//! [`SampleSet`]; the [`Sampler`] trait is the seam between the experiment
//! driver and the local or remote annealers.

use std::collections::BTreeMap;

pub mod errors;
pub mod model;
pub mod rng;
pub mod sampler;
pub mod sampleset;

pub use errors::{ErrorInfo, IsingError};
pub use model::BinaryQuadraticModel;
pub use rng::{derive_substream_seed, RngHandle};
pub use sampler::{SampleParams, Sampler};
pub use sampleset::{SampleRecord, SampleSet};

/// Label of a spin variable (logical node or physical qubit).
pub type Variable = u32;

/// External field strength per node (`h`).
pub type FieldSpec = BTreeMap<Variable, f64>;

/// Coupling strength per node pair (`J`).
pub type CouplingSpec = BTreeMap<(Variable, Variable), f64>;
