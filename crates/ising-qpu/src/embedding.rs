//! Direct placement of logical variables onto hardware qubits.
//!
//! Each logical variable is mapped to exactly one qubit and each logical
//! interaction must land on a working coupler. Small sparse models such as
//! short chains always fit on the production topologies this way, so no
//! chains (and no chain-break resolution) are needed.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use ising_core::{BinaryQuadraticModel, ErrorInfo, IsingError, Variable};
use tracing::debug;

use crate::wire::SolverProperties;

/// Logical variable to physical qubit.
pub type Embedding = BTreeMap<Variable, Variable>;

/// Default number of placement attempts before giving up.
pub const DEFAULT_SEARCH_BUDGET: usize = 100_000;

/// Working qubits and couplers of a solver as an adjacency map.
#[derive(Debug, Clone, Default)]
pub struct TargetGraph {
    adjacency: BTreeMap<Variable, BTreeSet<Variable>>,
}

impl TargetGraph {
    /// Builds the graph from solver properties, ignoring couplers on missing qubits.
    pub fn from_properties(properties: &SolverProperties) -> Self {
        let mut adjacency: BTreeMap<Variable, BTreeSet<Variable>> = properties
            .qubits
            .iter()
            .map(|&q| (q, BTreeSet::new()))
            .collect();
        for &[a, b] in &properties.couplers {
            if a == b || !adjacency.contains_key(&a) || !adjacency.contains_key(&b) {
                continue;
            }
            adjacency.entry(a).or_default().insert(b);
            adjacency.entry(b).or_default().insert(a);
        }
        Self { adjacency }
    }

    /// Builds a graph from an explicit edge list.
    pub fn from_edges(qubits: &[Variable], edges: &[(Variable, Variable)]) -> Self {
        let properties = SolverProperties {
            qubits: qubits.to_vec(),
            couplers: edges.iter().map(|&(a, b)| [a, b]).collect(),
            ..SolverProperties::default()
        };
        Self::from_properties(&properties)
    }

    /// Number of working qubits.
    pub fn num_qubits(&self) -> usize {
        self.adjacency.len()
    }

    /// Whether `a` and `b` share a working coupler.
    pub fn has_edge(&self, a: Variable, b: Variable) -> bool {
        self.adjacency.get(&a).is_some_and(|n| n.contains(&b))
    }

    fn degree(&self, q: Variable) -> usize {
        self.adjacency.get(&q).map_or(0, BTreeSet::len)
    }
}

/// Finds a one-qubit-per-variable embedding of `bqm` into `target`.
///
/// Variables are placed in breadth-first order from the most connected one;
/// candidates for a variable are the free neighbours of an already placed
/// logical neighbour, or any free qubit with enough degree when none is
/// placed yet. The search backtracks and fails once `budget` placements
/// have been attempted.
pub fn find_direct_embedding(
    bqm: &BinaryQuadraticModel,
    target: &TargetGraph,
    budget: usize,
) -> Result<Embedding, IsingError> {
    let logical = logical_adjacency(bqm);
    if logical.len() > target.num_qubits() {
        return Err(IsingError::Embedding(
            ErrorInfo::new("no-placement", "model has more variables than the solver has qubits")
                .with_context("variables", logical.len().to_string())
                .with_context("qubits", target.num_qubits().to_string()),
        ));
    }

    let order = placement_order(&logical);
    let mut search = Search {
        logical: &logical,
        target,
        order: &order,
        placed: Embedding::new(),
        used: BTreeSet::new(),
        steps: 0,
        budget,
    };
    match search.place(0) {
        Some(true) => {
            debug!(
                variables = order.len(),
                steps = search.steps,
                "found direct embedding"
            );
            Ok(search.placed)
        }
        Some(false) => Err(IsingError::Embedding(
            ErrorInfo::new("no-placement", "no direct embedding exists on this solver")
                .with_context("variables", order.len().to_string())
                .with_hint("the model needs chains; shrink it or pick a denser solver"),
        )),
        None => Err(IsingError::Embedding(
            ErrorInfo::new("search-budget", "embedding search exhausted its budget")
                .with_context("budget", budget.to_string()),
        )),
    }
}

/// Checks that `embedding` places every variable on a distinct qubit and every
/// interaction on a coupler.
pub fn verify_embedding(
    bqm: &BinaryQuadraticModel,
    target: &TargetGraph,
    embedding: &Embedding,
) -> bool {
    let distinct: BTreeSet<&Variable> = embedding.values().collect();
    distinct.len() == embedding.len()
        && bqm
            .linear()
            .keys()
            .all(|v| embedding.get(v).is_some_and(|q| target.adjacency.contains_key(q)))
        && bqm.quadratic().keys().all(|(u, v)| {
            match (embedding.get(u), embedding.get(v)) {
                (Some(&a), Some(&b)) => target.has_edge(a, b),
                _ => false,
            }
        })
}

fn logical_adjacency(bqm: &BinaryQuadraticModel) -> BTreeMap<Variable, BTreeSet<Variable>> {
    let mut adjacency: BTreeMap<Variable, BTreeSet<Variable>> = bqm
        .variables()
        .into_iter()
        .map(|v| (v, BTreeSet::new()))
        .collect();
    for &(u, v) in bqm.quadratic().keys() {
        adjacency.entry(u).or_default().insert(v);
        adjacency.entry(v).or_default().insert(u);
    }
    adjacency
}

/// Breadth-first order per connected component, each seeded at its highest degree node.
fn placement_order(logical: &BTreeMap<Variable, BTreeSet<Variable>>) -> Vec<Variable> {
    let mut remaining: Vec<Variable> = logical.keys().copied().collect();
    remaining.sort_by_key(|v| std::cmp::Reverse(logical[v].len()));
    let mut seen = BTreeSet::new();
    let mut order = Vec::with_capacity(logical.len());
    for root in remaining {
        if !seen.insert(root) {
            continue;
        }
        let mut queue = VecDeque::from([root]);
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for &n in &logical[&v] {
                if seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
    }
    order
}

struct Search<'a> {
    logical: &'a BTreeMap<Variable, BTreeSet<Variable>>,
    target: &'a TargetGraph,
    order: &'a [Variable],
    placed: Embedding,
    used: BTreeSet<Variable>,
    steps: usize,
    budget: usize,
}

impl Search<'_> {
    /// `Some(true)` on success, `Some(false)` when exhausted, `None` when over budget.
    fn place(&mut self, depth: usize) -> Option<bool> {
        let Some(&var) = self.order.get(depth) else {
            return Some(true);
        };
        for qubit in self.candidates(var) {
            self.steps += 1;
            if self.steps > self.budget {
                return None;
            }
            if !self.fits(var, qubit) {
                continue;
            }
            self.placed.insert(var, qubit);
            self.used.insert(qubit);
            match self.place(depth + 1) {
                Some(false) => {}
                done => return done,
            }
            self.placed.remove(&var);
            self.used.remove(&qubit);
        }
        Some(false)
    }

    fn candidates(&self, var: Variable) -> Vec<Variable> {
        let needed = self.logical[&var].len();
        let anchor = self.logical[&var]
            .iter()
            .find_map(|n| self.placed.get(n).copied());
        let pool: Vec<Variable> = match anchor {
            Some(q) => self.target.adjacency[&q].iter().copied().collect(),
            None => self.target.adjacency.keys().copied().collect(),
        };
        pool.into_iter()
            .filter(|q| !self.used.contains(q) && self.target.degree(*q) >= needed)
            .collect()
    }

    fn fits(&self, var: Variable, qubit: Variable) -> bool {
        self.logical[&var].iter().all(|n| match self.placed.get(n) {
            Some(&q) => self.target.has_edge(qubit, q),
            None => true,
        })
    }
}
