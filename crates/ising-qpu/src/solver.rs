use std::collections::{BTreeMap, BTreeSet};
use std::thread;
use std::time::{Duration, Instant};

use ising_core::{
    BinaryQuadraticModel, ErrorInfo, IsingError, SampleParams, SampleRecord, SampleSet, Sampler,
    Variable,
};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::client::SapiClient;
use crate::config::SapiConfig;
use crate::qp;
use crate::wire::{ProblemState, ProblemStatus, ProblemSubmission, SolverInfo, SolverProperties};

/// Energies further apart than this trigger a mismatch warning.
const ENERGY_TOLERANCE: f64 = 1e-6;

/// A solver that only accepts problems on its own qubits and couplers.
pub trait StructuredSolver {
    /// Solver id.
    fn solver_id(&self) -> &str;

    /// Hardware graph and parameter ranges.
    fn properties(&self) -> &SolverProperties;

    /// Samples a model already expressed over the solver's qubits.
    fn sample_structured(
        &self,
        bqm: &BinaryQuadraticModel,
        params: &SampleParams,
    ) -> Result<SampleSet, IsingError>;
}

/// Checks that every variable is a working qubit and every interaction a coupler.
pub fn check_structure(
    bqm: &BinaryQuadraticModel,
    properties: &SolverProperties,
) -> Result<(), IsingError> {
    let qubits: BTreeSet<Variable> = properties.qubits.iter().copied().collect();
    if let Some(v) = bqm.variables().into_iter().find(|v| !qubits.contains(v)) {
        return Err(IsingError::Model(
            ErrorInfo::new("not-structured", "variable is not a working qubit")
                .with_context("variable", v.to_string()),
        ));
    }
    let couplers: BTreeSet<(Variable, Variable)> = properties
        .couplers
        .iter()
        .map(|&[a, b]| (a.min(b), a.max(b)))
        .collect();
    if let Some(&(u, v)) = bqm.quadratic().keys().find(|&key| !couplers.contains(key)) {
        return Err(IsingError::Model(
            ErrorInfo::new("not-structured", "interaction is not a working coupler")
                .with_context("coupler", format!("{u}-{v}")),
        ));
    }
    Ok(())
}

/// Remote quantum annealer reached through the solver API.
#[derive(Debug)]
pub struct DWaveSampler {
    client: SapiClient,
    solver: SolverInfo,
    poll_interval: Duration,
    max_wait: Option<Duration>,
}

impl DWaveSampler {
    /// Connects and resolves the configured solver, or the first online QPU.
    pub fn connect(config: &SapiConfig) -> Result<Self, IsingError> {
        let client = SapiClient::new(config)?;
        let solver = match &config.solver {
            Some(id) => client.get_solver(id)?,
            None => client
                .list_solvers()?
                .into_iter()
                .find(|solver| solver.is_online() && solver.is_qpu())
                .ok_or_else(|| {
                    IsingError::Remote(
                        ErrorInfo::new("no-solver", "no online QPU solver is available")
                            .with_context("endpoint", config.endpoint.clone())
                            .with_hint("set DWAVE_API_SOLVER to pick a solver explicitly"),
                    )
                })?,
        };
        info!(
            solver = %solver.id,
            qubits = solver.properties.qubits.len(),
            couplers = solver.properties.couplers.len(),
            "connected to remote solver"
        );
        Ok(Self {
            client,
            solver,
            poll_interval: config.poll_interval,
            max_wait: config.max_wait,
        })
    }

    /// Description of the resolved solver.
    pub fn solver(&self) -> &SolverInfo {
        &self.solver
    }

    fn wait_for_answer(&self, mut status: ProblemStatus) -> Result<ProblemStatus, IsingError> {
        let started = Instant::now();
        while !status.status.is_terminal() {
            if let Some(limit) = self.max_wait {
                if started.elapsed() >= limit {
                    return Err(IsingError::Remote(
                        ErrorInfo::new("wait-exceeded", "problem did not finish in time")
                            .with_context("problem_id", status.id.clone())
                            .with_context("waited_secs", limit.as_secs().to_string()),
                    ));
                }
            }
            debug!(problem_id = %status.id, state = ?status.status, "polling");
            thread::sleep(self.poll_interval);
            status = self.client.problem_status(&status.id)?;
        }
        match status.status {
            ProblemState::Completed => Ok(status),
            state => Err(IsingError::Remote(
                ErrorInfo::new("problem-failed", format!("problem ended as {state:?}"))
                    .with_context("problem_id", status.id.clone())
                    .with_context(
                        "error_message",
                        status.error_message.clone().unwrap_or_default(),
                    ),
            )),
        }
    }
}

impl StructuredSolver for DWaveSampler {
    fn solver_id(&self) -> &str {
        &self.solver.id
    }

    fn properties(&self) -> &SolverProperties {
        &self.solver.properties
    }

    fn sample_structured(
        &self,
        bqm: &BinaryQuadraticModel,
        params: &SampleParams,
    ) -> Result<SampleSet, IsingError> {
        check_structure(bqm, self.properties())?;
        let submission = ProblemSubmission {
            solver: self.solver.id.clone(),
            data: qp::encode_ising(bqm, self.properties())?,
            problem_type: "ising".to_string(),
            params: json!({ "num_reads": params.num_reads, "auto_scale": true }),
            label: params.label.clone(),
        };
        let submitted = self.client.submit(&submission)?;
        info!(problem_id = %submitted.id, reads = params.num_reads, "problem submitted");
        let status = self.wait_for_answer(submitted)?;
        let answer = match status.answer {
            Some(answer) => answer,
            None => self.client.answer(&status.id)?,
        };
        let decoded = qp::decode_ising_answer(&answer)?;
        let set = build_sample_set(bqm, &decoded)?;
        Ok(set
            .with_info("problem_id", json!(status.id))
            .with_info("solver", json!(self.solver.id))
            .with_info("timing", answer.timing))
    }
}

impl Sampler for DWaveSampler {
    fn name(&self) -> &str {
        "dwave"
    }

    fn sample(
        &self,
        bqm: &BinaryQuadraticModel,
        params: &SampleParams,
    ) -> Result<SampleSet, IsingError> {
        self.sample_structured(bqm, params)
    }
}

/// Rebuilds a sample set over the model's own variables from a decoded answer.
///
/// Energies are recomputed from the model (offset included); answers whose
/// reported energies disagree are logged, not rejected.
pub fn build_sample_set(
    bqm: &BinaryQuadraticModel,
    decoded: &qp::DecodedAnswer,
) -> Result<SampleSet, IsingError> {
    let columns: BTreeMap<Variable, usize> = decoded
        .active_variables
        .iter()
        .enumerate()
        .map(|(idx, &q)| (q, idx))
        .collect();
    let variables = bqm.variables();
    let mut records = Vec::with_capacity(decoded.solutions.len());
    for (row, solution) in decoded.solutions.iter().enumerate() {
        let sample = variables
            .iter()
            .map(|v| {
                columns.get(v).map(|&col| solution[col]).ok_or_else(|| {
                    IsingError::Serde(
                        ErrorInfo::new("answer-missing-variable", "answer omits a problem qubit")
                            .with_context("qubit", v.to_string()),
                    )
                })
            })
            .collect::<Result<Vec<i8>, _>>()?;
        let energy = bqm.energy_of(&variables, &sample)?;
        let reported = decoded.energies[row] + bqm.offset();
        if (reported - energy).abs() > ENERGY_TOLERANCE {
            warn!(row, reported, recomputed = energy, "reported energy differs from model");
        }
        records.push(SampleRecord {
            sample,
            energy,
            num_occurrences: decoded.num_occurrences[row],
        });
    }
    SampleSet::new(variables, records)
}
