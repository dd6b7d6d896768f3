//! Encoder and decoder for the solver API's `qp` binary format.

use std::collections::BTreeSet;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ising_core::{BinaryQuadraticModel, ErrorInfo, IsingError, Variable};

use crate::wire::{QpAnswer, QpProblem, SolverProperties};

/// Decoded `qp` answer.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAnswer {
    /// Qubit labels, one per solution column.
    pub active_variables: Vec<Variable>,
    /// Energy reported for each solution.
    pub energies: Vec<f64>,
    /// Occurrence count for each solution.
    pub num_occurrences: Vec<u64>,
    /// Spin rows.
    pub solutions: Vec<Vec<i8>>,
}

/// Encodes a qubit-labelled Ising model for the given solver.
pub fn encode_ising(
    bqm: &BinaryQuadraticModel,
    properties: &SolverProperties,
) -> Result<QpProblem, IsingError> {
    let width = properties.encoding_width();
    let active: BTreeSet<Variable> = bqm.linear().keys().copied().collect();
    if let Some(&out_of_range) = active.iter().find(|&&q| q as usize >= width) {
        return Err(IsingError::Model(
            ErrorInfo::new("qubit-range", "variable exceeds the solver's qubit count")
                .with_context("qubit", out_of_range.to_string())
                .with_context("num_qubits", width.to_string()),
        ));
    }

    let lin: Vec<f64> = (0..width as Variable)
        .map(|q| {
            if active.contains(&q) {
                bqm.linear_bias(q)
            } else {
                f64::NAN
            }
        })
        .collect();
    let quad: Vec<f64> = properties
        .couplers
        .iter()
        .filter(|[a, b]| active.contains(a) && active.contains(b))
        .map(|&[a, b]| bqm.quadratic_bias(a, b).unwrap_or(0.0))
        .collect();

    Ok(QpProblem {
        format: "qp".to_string(),
        lin: encode_f64(&lin),
        quad: encode_f64(&quad),
    })
}

/// Decodes an Ising `qp` answer.
pub fn decode_ising_answer(answer: &QpAnswer) -> Result<DecodedAnswer, IsingError> {
    if answer.format != "qp" {
        return Err(IsingError::Serde(
            ErrorInfo::new("answer-format", "unsupported answer format")
                .with_context("format", answer.format.clone()),
        ));
    }
    let active_variables: Vec<Variable> = decode_i32(&answer.active_variables, "active_variables")?
        .into_iter()
        .map(|q| Variable::try_from(q).map_err(|_| negative_label(q)))
        .collect::<Result<_, _>>()?;
    let energies = decode_f64(&answer.energies, "energies")?;
    let num_occurrences: Vec<u64> = match &answer.num_occurrences {
        Some(encoded) => decode_i32(encoded, "num_occurrences")?
            .into_iter()
            .map(|count| count.max(0) as u64)
            .collect(),
        None => vec![1; energies.len()],
    };
    if num_occurrences.len() != energies.len() {
        return Err(IsingError::Serde(
            ErrorInfo::new("answer-shape", "occurrence and energy counts differ")
                .with_context("energies", energies.len().to_string())
                .with_context("num_occurrences", num_occurrences.len().to_string()),
        ));
    }

    let bits = decode_bytes(&answer.solutions, "solutions")?;
    let row_bytes = active_variables.len().div_ceil(8);
    let expected = row_bytes * energies.len();
    if bits.len() != expected {
        return Err(IsingError::Serde(
            ErrorInfo::new("answer-shape", "solution bytes do not match row count")
                .with_context("bytes", bits.len().to_string())
                .with_context("expected", expected.to_string()),
        ));
    }
    let solutions = if row_bytes == 0 {
        vec![Vec::new(); energies.len()]
    } else {
        bits.chunks(row_bytes)
            .map(|row| unpack_spins(row, active_variables.len()))
            .collect()
    };

    Ok(DecodedAnswer {
        active_variables,
        energies,
        num_occurrences,
        solutions,
    })
}

/// Unpacks MSB-first bits into spins, bit 1 meaning spin up.
fn unpack_spins(row: &[u8], width: usize) -> Vec<i8> {
    (0..width)
        .map(|idx| {
            let bit = (row[idx / 8] >> (7 - idx % 8)) & 1;
            if bit == 1 {
                1
            } else {
                -1
            }
        })
        .collect()
}

fn encode_f64(values: &[f64]) -> String {
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    STANDARD.encode(bytes)
}

fn decode_bytes(encoded: &str, field: &str) -> Result<Vec<u8>, IsingError> {
    STANDARD.decode(encoded).map_err(|err| {
        IsingError::Serde(ErrorInfo::new("base64", err.to_string()).with_context("field", field))
    })
}

fn decode_f64(encoded: &str, field: &str) -> Result<Vec<f64>, IsingError> {
    let bytes = decode_bytes(encoded, field)?;
    check_stride(&bytes, 8, field)?;
    Ok(bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect())
}

fn decode_i32(encoded: &str, field: &str) -> Result<Vec<i32>, IsingError> {
    let bytes = decode_bytes(encoded, field)?;
    check_stride(&bytes, 4, field)?;
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(chunk);
            i32::from_le_bytes(raw)
        })
        .collect())
}

fn check_stride(bytes: &[u8], stride: usize, field: &str) -> Result<(), IsingError> {
    if bytes.len() % stride != 0 {
        return Err(IsingError::Serde(
            ErrorInfo::new("answer-shape", "field length is not a whole number of items")
                .with_context("field", field)
                .with_context("bytes", bytes.len().to_string()),
        ));
    }
    Ok(())
}

fn negative_label(label: i32) -> IsingError {
    IsingError::Serde(
        ErrorInfo::new("answer-label", "negative qubit label in answer")
            .with_context("label", label.to_string()),
    )
}
