use ising_core::{CouplingSpec, FieldSpec, Variable};

/// Node labels of the chain.
pub const NODES: [Variable; 3] = [0, 1, 2];

/// Constant energy term of every model.
pub const OFFSET: f64 = 0.0;

/// Field strengths visited by the sweep, from zero up to 2e-3.
pub const FIELD_SWEEP: [f64; 10] = [0.0, 1e-5, 2e-5, 5e-5, 1e-4, 2e-4, 5e-4, 1e-3, 1.5e-3, 2e-3];

/// All-zero field used by the single run.
pub fn zero_field() -> FieldSpec {
    uniform_field(0.0)
}

/// Same field strength on every node.
pub fn uniform_field(value: f64) -> FieldSpec {
    NODES.iter().map(|&node| (node, value)).collect()
}

/// One uniform field per value, in the order given.
pub fn sweep_fields(values: &[f64]) -> Vec<FieldSpec> {
    values.iter().map(|&value| uniform_field(value)).collect()
}

/// Unit antiferromagnetic couplings along the chain 0-1-2.
pub fn chain_couplings() -> CouplingSpec {
    [((0, 1), 1.0), ((1, 2), 1.0)].into_iter().collect()
}
