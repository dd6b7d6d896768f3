//! JSON payloads exchanged with the solver API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ising_core::Variable;

/// Solver description returned by `GET solvers/remote/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverInfo {
    /// Solver id, e.g. `Advantage_system4.1`.
    pub id: String,
    /// Availability, usually `ONLINE`.
    #[serde(default)]
    pub status: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Current queue load in `[0, 1]`, when reported.
    #[serde(default)]
    pub avg_load: Option<f64>,
    /// Structural and parametric properties.
    #[serde(default)]
    pub properties: SolverProperties,
}

impl SolverInfo {
    /// Whether the solver reports itself online (missing status counts as online).
    pub fn is_online(&self) -> bool {
        self.status
            .as_deref()
            .map_or(true, |status| status.eq_ignore_ascii_case("online"))
    }

    /// Whether the solver is a structured quantum processor.
    pub fn is_qpu(&self) -> bool {
        match self.properties.category.as_deref() {
            Some(category) => category.eq_ignore_ascii_case("qpu"),
            None => !self.properties.qubits.is_empty() && !self.properties.couplers.is_empty(),
        }
    }
}

/// Subset of solver properties used for encoding and embedding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverProperties {
    /// Working qubits.
    #[serde(default)]
    pub qubits: Vec<Variable>,
    /// Working couplers; their order defines the `qp` quadratic layout.
    #[serde(default)]
    pub couplers: Vec<[Variable; 2]>,
    /// Total qubit count including inactive ones.
    #[serde(default)]
    pub num_qubits: Option<usize>,
    /// Allowed linear bias range.
    #[serde(default)]
    pub h_range: Option<[f64; 2]>,
    /// Allowed coupling range.
    #[serde(default)]
    pub j_range: Option<[f64; 2]>,
    /// Allowed `num_reads` range.
    #[serde(default)]
    pub num_reads_range: Option<[u64; 2]>,
    /// Problem types the solver accepts.
    #[serde(default)]
    pub supported_problem_types: Vec<String>,
    /// Solver category (`qpu`, `hybrid`, `software`).
    #[serde(default)]
    pub category: Option<String>,
}

impl SolverProperties {
    /// Length of the `qp` linear array.
    pub fn encoding_width(&self) -> usize {
        self.num_qubits.unwrap_or_else(|| {
            self.qubits
                .iter()
                .max()
                .map_or(0, |&max| max as usize + 1)
        })
    }
}

/// Compact `qp` problem encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QpProblem {
    /// Always `qp`.
    pub format: String,
    /// Base64 little-endian f64 linear biases over every qubit (NaN = inactive).
    pub lin: String,
    /// Base64 little-endian f64 biases over active couplers in solver order.
    pub quad: String,
}

/// Body element of `POST problems/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSubmission {
    /// Target solver id.
    pub solver: String,
    /// Encoded problem data.
    pub data: QpProblem,
    /// Problem type, `ising` here.
    #[serde(rename = "type")]
    pub problem_type: String,
    /// Solver parameters such as `num_reads`.
    pub params: Value,
    /// Optional job label shown in the dashboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Lifecycle state of a submitted problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemState {
    /// Queued.
    Pending,
    /// Running on the solver.
    InProgress,
    /// Finished with an answer.
    Completed,
    /// Rejected or crashed.
    Failed,
    /// Cancelled by the user.
    Cancelled,
    /// Any state this client does not know.
    #[serde(other)]
    Unknown,
}

impl ProblemState {
    /// Whether polling should stop.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProblemState::Completed | ProblemState::Failed | ProblemState::Cancelled
        )
    }
}

/// Status record for a submitted problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemStatus {
    /// Problem id assigned by the service.
    pub id: String,
    /// Current state.
    pub status: ProblemState,
    /// Answer, present once completed (sometimes fetched separately).
    #[serde(default)]
    pub answer: Option<QpAnswer>,
    /// Failure description for failed problems.
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Compact `qp` answer encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QpAnswer {
    /// Always `qp`.
    pub format: String,
    /// Width of the encoded problem.
    #[serde(default)]
    pub num_variables: Option<usize>,
    /// Base64 little-endian i32 labels of the active qubits.
    pub active_variables: String,
    /// Base64 little-endian f64 energy per solution.
    pub energies: String,
    /// Base64 little-endian i32 occurrence count per solution.
    #[serde(default)]
    pub num_occurrences: Option<String>,
    /// Base64 bit-packed solutions, one byte-aligned row each.
    pub solutions: String,
    /// Service timing breakdown.
    #[serde(default)]
    pub timing: Value,
}
