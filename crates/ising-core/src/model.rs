//! Spin-valued binary quadratic model.

use std::collections::BTreeMap;

use crate::errors::{ErrorInfo, IsingError};
use crate::{CouplingSpec, FieldSpec, Variable};

/// Spin-valued binary quadratic model `E(s) = offset + Σ h_i s_i + Σ J_ij s_i s_j`.
///
/// Interaction keys are stored with the smaller label first. Every variable
/// that takes part in an interaction also has a (possibly zero) linear entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinaryQuadraticModel {
    linear: BTreeMap<Variable, f64>,
    quadratic: BTreeMap<(Variable, Variable), f64>,
    offset: f64,
}

impl BinaryQuadraticModel {
    /// Creates an empty model with the given constant offset.
    pub fn new(offset: f64) -> Self {
        Self {
            linear: BTreeMap::new(),
            quadratic: BTreeMap::new(),
            offset,
        }
    }

    /// Builds a model from Ising field and coupling mappings.
    pub fn from_ising(h: &FieldSpec, j: &CouplingSpec, offset: f64) -> Result<Self, IsingError> {
        let mut bqm = Self::new(offset);
        for (&v, &bias) in h {
            bqm.add_variable(v, bias);
        }
        for (&(u, v), &bias) in j {
            bqm.add_interaction(u, v, bias)?;
        }
        Ok(bqm)
    }

    /// Adds `bias` to the linear term of `v`, creating the variable if needed.
    pub fn add_variable(&mut self, v: Variable, bias: f64) {
        *self.linear.entry(v).or_insert(0.0) += bias;
    }

    /// Adds `bias` to the interaction between `u` and `v`.
    pub fn add_interaction(
        &mut self,
        u: Variable,
        v: Variable,
        bias: f64,
    ) -> Result<(), IsingError> {
        if u == v {
            return Err(IsingError::Model(
                ErrorInfo::new("self-loop", "interaction endpoints must differ")
                    .with_context("variable", u.to_string()),
            ));
        }
        self.linear.entry(u).or_insert(0.0);
        self.linear.entry(v).or_insert(0.0);
        *self.quadratic.entry(ordered(u, v)).or_insert(0.0) += bias;
        Ok(())
    }

    /// Linear biases keyed by variable.
    pub fn linear(&self) -> &BTreeMap<Variable, f64> {
        &self.linear
    }

    /// Quadratic biases keyed by ordered variable pair.
    pub fn quadratic(&self) -> &BTreeMap<(Variable, Variable), f64> {
        &self.quadratic
    }

    /// Constant energy offset.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Variables in ascending label order.
    pub fn variables(&self) -> Vec<Variable> {
        self.linear.keys().copied().collect()
    }

    /// Number of variables in the model.
    pub fn num_variables(&self) -> usize {
        self.linear.len()
    }

    /// Number of distinct interactions.
    pub fn num_interactions(&self) -> usize {
        self.quadratic.len()
    }

    /// Linear bias of `v`, zero when absent.
    pub fn linear_bias(&self, v: Variable) -> f64 {
        self.linear.get(&v).copied().unwrap_or(0.0)
    }

    /// Quadratic bias between `u` and `v` in either orientation.
    pub fn quadratic_bias(&self, u: Variable, v: Variable) -> Option<f64> {
        self.quadratic.get(&ordered(u, v)).copied()
    }

    /// Neighbour lists with coupling strengths, for every variable.
    pub fn adjacency(&self) -> BTreeMap<Variable, Vec<(Variable, f64)>> {
        let mut adj: BTreeMap<Variable, Vec<(Variable, f64)>> =
            self.linear.keys().map(|&v| (v, Vec::new())).collect();
        for (&(u, v), &bias) in &self.quadratic {
            adj.entry(u).or_default().push((v, bias));
            adj.entry(v).or_default().push((u, bias));
        }
        adj
    }

    /// Energy of a full spin assignment given as a label to spin mapping.
    pub fn energy(&self, assignment: &BTreeMap<Variable, i8>) -> Result<f64, IsingError> {
        let spin = |v: Variable| -> Result<f64, IsingError> {
            assignment.get(&v).map(|&s| f64::from(s)).ok_or_else(|| {
                IsingError::Model(
                    ErrorInfo::new("missing-variable", "assignment does not cover the model")
                        .with_context("variable", v.to_string()),
                )
            })
        };
        let mut energy = self.offset;
        for (&v, &bias) in &self.linear {
            energy += bias * spin(v)?;
        }
        for (&(u, v), &bias) in &self.quadratic {
            energy += bias * spin(u)? * spin(v)?;
        }
        Ok(energy)
    }

    /// Energy of spins listed in the order of `variables`.
    pub fn energy_of(&self, variables: &[Variable], spins: &[i8]) -> Result<f64, IsingError> {
        if variables.len() != spins.len() {
            return Err(IsingError::Model(
                ErrorInfo::new("length-mismatch", "spin vector length differs from labels")
                    .with_context("labels", variables.len().to_string())
                    .with_context("spins", spins.len().to_string()),
            ));
        }
        let assignment: BTreeMap<Variable, i8> =
            variables.iter().copied().zip(spins.iter().copied()).collect();
        self.energy(&assignment)
    }

    /// Returns a copy with every variable renamed through `mapping`.
    ///
    /// Variables absent from `mapping` are an error, as is a mapping that
    /// sends two variables to the same label.
    pub fn relabel(&self, mapping: &BTreeMap<Variable, Variable>) -> Result<Self, IsingError> {
        let target = |v: Variable| -> Result<Variable, IsingError> {
            mapping.get(&v).copied().ok_or_else(|| {
                IsingError::Model(
                    ErrorInfo::new("unmapped-variable", "relabel mapping is incomplete")
                        .with_context("variable", v.to_string()),
                )
            })
        };
        let mut out = Self::new(self.offset);
        for (&v, &bias) in &self.linear {
            let label = target(v)?;
            if out.linear.contains_key(&label) {
                return Err(IsingError::Model(
                    ErrorInfo::new("relabel-collision", "two variables map to one label")
                        .with_context("label", label.to_string()),
                ));
            }
            out.add_variable(label, bias);
        }
        for (&(u, v), &bias) in &self.quadratic {
            out.add_interaction(target(u)?, target(v)?, bias)?;
        }
        Ok(out)
    }
}

fn ordered(u: Variable, v: Variable) -> (Variable, Variable) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}
