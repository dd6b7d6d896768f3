//! Composite that embeds logical models onto a structured solver.

use std::collections::BTreeMap;

use ising_core::{
    BinaryQuadraticModel, ErrorInfo, IsingError, SampleParams, SampleRecord, SampleSet, Sampler,
    Variable,
};
use serde_json::{json, Value};
use tracing::info;

use crate::embedding::{find_direct_embedding, Embedding, TargetGraph, DEFAULT_SEARCH_BUDGET};
use crate::solver::StructuredSolver;

/// Maps a model onto the child's hardware graph, samples it there and maps
/// the answer back to the logical labels.
#[derive(Debug)]
pub struct EmbeddingComposite<S> {
    child: S,
    search_budget: usize,
}

impl<S: StructuredSolver> EmbeddingComposite<S> {
    /// Wraps a structured solver.
    pub fn new(child: S) -> Self {
        Self {
            child,
            search_budget: DEFAULT_SEARCH_BUDGET,
        }
    }

    /// Overrides the embedding search budget.
    pub fn with_search_budget(mut self, budget: usize) -> Self {
        self.search_budget = budget;
        self
    }

    /// The wrapped solver.
    pub fn child(&self) -> &S {
        &self.child
    }

    /// Finds the embedding that [`Sampler::sample`] would use for `bqm`.
    pub fn embed(&self, bqm: &BinaryQuadraticModel) -> Result<Embedding, IsingError> {
        let target = TargetGraph::from_properties(self.child.properties());
        find_direct_embedding(bqm, &target, self.search_budget)
    }
}

impl<S: StructuredSolver> Sampler for EmbeddingComposite<S> {
    fn name(&self) -> &str {
        "dwave"
    }

    fn sample(
        &self,
        bqm: &BinaryQuadraticModel,
        params: &SampleParams,
    ) -> Result<SampleSet, IsingError> {
        let embedding = self.embed(bqm)?;
        info!(
            solver = self.child.solver_id(),
            variables = embedding.len(),
            "embedded model"
        );
        let physical = bqm.relabel(&embedding)?;
        let answer = self.child.sample_structured(&physical, params)?;
        let mut logical = unembed(bqm, &embedding, &answer)?;
        for (key, value) in answer.info() {
            logical.insert_info(key.clone(), value.clone());
        }
        logical.insert_info("embedding_context", embedding_context(&embedding));
        Ok(logical)
    }
}

/// Translates a qubit-labelled sample set back to the logical variables of `bqm`.
pub fn unembed(
    bqm: &BinaryQuadraticModel,
    embedding: &Embedding,
    answer: &SampleSet,
) -> Result<SampleSet, IsingError> {
    let columns: BTreeMap<Variable, usize> = answer
        .variables()
        .iter()
        .enumerate()
        .map(|(idx, &q)| (q, idx))
        .collect();
    let variables = bqm.variables();
    let picks = variables
        .iter()
        .map(|v| {
            embedding
                .get(v)
                .and_then(|q| columns.get(q))
                .copied()
                .ok_or_else(|| {
                    IsingError::Embedding(
                        ErrorInfo::new("unembed", "answer lacks the qubit of a variable")
                            .with_context("variable", v.to_string()),
                    )
                })
        })
        .collect::<Result<Vec<usize>, _>>()?;

    let mut records = Vec::with_capacity(answer.len());
    for record in answer.records() {
        let sample: Vec<i8> = picks.iter().map(|&col| record.sample[col]).collect();
        let energy = bqm.energy_of(&variables, &sample)?;
        records.push(SampleRecord {
            sample,
            energy,
            num_occurrences: record.num_occurrences,
        });
    }
    SampleSet::new(variables, records)
}

fn embedding_context(embedding: &Embedding) -> Value {
    let chains: BTreeMap<String, Vec<Variable>> = embedding
        .iter()
        .map(|(v, &q)| (v.to_string(), vec![q]))
        .collect();
    json!({ "embedding": chains, "chain_strength": Value::Null })
}
