//! Sample sets returned by samplers and their tabular rendering.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ErrorInfo, IsingError};
use crate::model::BinaryQuadraticModel;
use crate::Variable;

/// One row of a sample set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Spin values ordered like [`SampleSet::variables`].
    pub sample: Vec<i8>,
    /// Energy of the assignment under the sampled model.
    pub energy: f64,
    /// Number of reads that produced this assignment.
    pub num_occurrences: u64,
}

/// Collection of spin assignments with their energies and occurrence counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    variables: Vec<Variable>,
    records: Vec<SampleRecord>,
    /// Free-form sampler metadata (timing, beta range, embedding, problem id).
    #[serde(default)]
    info: BTreeMap<String, Value>,
}

impl SampleSet {
    /// Creates a sample set, checking that every record matches the labels.
    pub fn new(variables: Vec<Variable>, records: Vec<SampleRecord>) -> Result<Self, IsingError> {
        for (row, record) in records.iter().enumerate() {
            if record.sample.len() != variables.len() {
                return Err(IsingError::Model(
                    ErrorInfo::new("ragged-sample", "sample width differs from variable count")
                        .with_context("row", row.to_string())
                        .with_context("width", record.sample.len().to_string())
                        .with_context("variables", variables.len().to_string()),
                ));
            }
        }
        Ok(Self {
            variables,
            records,
            info: BTreeMap::new(),
        })
    }

    /// Builds a sample set by evaluating each raw sample against `bqm`.
    pub fn from_samples(
        bqm: &BinaryQuadraticModel,
        variables: Vec<Variable>,
        samples: Vec<Vec<i8>>,
    ) -> Result<Self, IsingError> {
        let mut records = Vec::with_capacity(samples.len());
        for sample in samples {
            let energy = bqm.energy_of(&variables, &sample)?;
            records.push(SampleRecord {
                sample,
                energy,
                num_occurrences: 1,
            });
        }
        Self::new(variables, records)
    }

    /// Attaches an info entry.
    pub fn with_info(mut self, key: impl Into<String>, value: Value) -> Self {
        self.info.insert(key.into(), value);
        self
    }

    /// Inserts an info entry in place.
    pub fn insert_info(&mut self, key: impl Into<String>, value: Value) {
        self.info.insert(key.into(), value);
    }

    /// Variable labels, one per sample column.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Records in the order the sampler produced them.
    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    /// Sampler metadata.
    pub fn info(&self) -> &BTreeMap<String, Value> {
        &self.info
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total reads across all rows.
    pub fn total_reads(&self) -> u64 {
        self.records.iter().map(|r| r.num_occurrences).sum()
    }

    /// Lowest-energy record; the earliest one wins ties.
    pub fn lowest(&self) -> Option<&SampleRecord> {
        self.records
            .iter()
            .reduce(|best, r| if r.energy < best.energy { r } else { best })
    }

    /// Records sorted by ascending energy, stable for equal energies.
    pub fn sorted_records(&self) -> Vec<&SampleRecord> {
        let mut rows: Vec<&SampleRecord> = self.records.iter().collect();
        rows.sort_by(|a, b| a.energy.total_cmp(&b.energy));
        rows
    }

    /// Renders the human readable table written to result files.
    pub fn to_table(&self) -> String {
        self.to_string()
    }
}

impl Display for SampleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.sorted_records();
        let index_width = rows.len().saturating_sub(1).to_string().len();
        let labels: Vec<String> = self.variables.iter().map(|v| v.to_string()).collect();
        let widths: Vec<usize> = labels.iter().map(|label| label.len().max(2)).collect();
        let energies: Vec<String> = rows.iter().map(|r| format_energy(r.energy)).collect();
        let energy_width = energies
            .iter()
            .map(String::len)
            .chain(std::iter::once("energy".len()))
            .max()
            .unwrap_or(0);
        let occ_width = rows
            .iter()
            .map(|r| r.num_occurrences.to_string().len())
            .chain(std::iter::once("num_oc.".len()))
            .max()
            .unwrap_or(0);

        write!(f, "{:index_width$}", "")?;
        for (label, &width) in labels.iter().zip(&widths) {
            write!(f, " {label:>width$}")?;
        }
        writeln!(f, " {:>energy_width$} {:>occ_width$}", "energy", "num_oc.")?;

        for (idx, (record, energy)) in rows.iter().zip(&energies).enumerate() {
            write!(f, "{idx:>index_width$}")?;
            for (&spin, &width) in record.sample.iter().zip(&widths) {
                write!(f, " {:>width$}", format_spin(spin))?;
            }
            writeln!(
                f,
                " {energy:>energy_width$} {:>occ_width$}",
                record.num_occurrences
            )?;
        }
        writeln!(
            f,
            "['SPIN', {} rows, {} samples, {} variables]",
            rows.len(),
            self.total_reads(),
            self.variables.len()
        )
    }
}

fn format_spin(spin: i8) -> &'static str {
    if spin > 0 {
        "+1"
    } else {
        "-1"
    }
}

fn format_energy(energy: f64) -> String {
    if energy.fract() == 0.0 && energy.abs() < 1e15 {
        format!("{energy:.1}")
    } else {
        format!("{energy}")
    }
}
