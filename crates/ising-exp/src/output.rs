use std::fs;
use std::path::{Path, PathBuf};

use globset::Glob;
use ising_core::{ErrorInfo, IsingError, SampleSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Sampler backend a result file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Local simulated annealing.
    Neal,
    /// Remote quantum annealing.
    Dwave,
}

impl Backend {
    /// File-name prefix and report key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Neal => "neal",
            Backend::Dwave => "dwave",
        }
    }
}

/// On-disk layout of a sample set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// Fixed-width table as printed by the samplers.
    #[default]
    Table,
    /// One CSV row per record.
    Csv,
}

/// `<backend>_output[_<index>].<ext>` inside `dir`; indices are 1-based.
pub fn result_path(dir: &Path, backend: Backend, index: Option<usize>, extension: &str) -> PathBuf {
    let stem = match index {
        Some(index) => format!("{}_output_{index}", backend.as_str()),
        None => format!("{}_output", backend.as_str()),
    };
    dir.join(format!("{stem}.{extension}"))
}

/// Deletes every file named `*.<extension>` directly inside `dir`.
///
/// Subdirectories and other files are left alone; a missing directory is
/// not an error. Returns the removed paths.
pub fn clear_results(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, IsingError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let matcher = Glob::new(&format!("*.{extension}"))
        .map_err(|err| {
            IsingError::Config(
                ErrorInfo::new("extension-glob", err.to_string())
                    .with_context("extension", extension),
            )
        })?
        .compile_matcher();

    let mut removed = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| IsingError::io("clear-walk", &err, dir))?;
        if !entry.file_type().is_file() || !matcher.is_match(entry.file_name()) {
            continue;
        }
        fs::remove_file(entry.path())
            .map_err(|err| IsingError::io("clear-remove", err, entry.path()))?;
        debug!(path = %entry.path().display(), "removed previous result");
        removed.push(entry.into_path());
    }
    info!(dir = %dir.display(), removed = removed.len(), "cleared previous results");
    Ok(removed)
}

/// Renders a sample set in the requested layout.
pub fn render(set: &SampleSet, format: TableFormat) -> Result<String, IsingError> {
    match format {
        TableFormat::Table => Ok(set.to_table()),
        TableFormat::Csv => render_csv(set),
    }
}

fn render_csv(set: &SampleSet) -> Result<String, IsingError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut header: Vec<String> = set.variables().iter().map(|v| v.to_string()).collect();
    header.push("energy".to_string());
    header.push("num_occurrences".to_string());
    writer.write_record(&header).map_err(csv_error)?;
    for record in set.sorted_records() {
        let mut row: Vec<String> = record.sample.iter().map(|s| s.to_string()).collect();
        row.push(record.energy.to_string());
        row.push(record.num_occurrences.to_string());
        writer.write_record(&row).map_err(csv_error)?;
    }
    let bytes = writer.into_inner().map_err(csv_error)?;
    String::from_utf8(bytes).map_err(csv_error)
}

fn csv_error(err: impl std::fmt::Display) -> IsingError {
    IsingError::Serde(ErrorInfo::new("csv-encode", err.to_string()))
}

/// Writes one backend's result and returns the file path.
pub fn write_sample_set(
    dir: &Path,
    backend: Backend,
    index: Option<usize>,
    extension: &str,
    set: &SampleSet,
    format: TableFormat,
) -> Result<PathBuf, IsingError> {
    fs::create_dir_all(dir).map_err(|err| IsingError::io("output-dir", err, dir))?;
    let path = result_path(dir, backend, index, extension);
    let body = render(set, format)?;
    fs::write(&path, body).map_err(|err| IsingError::io("output-write", err, &path))?;
    info!(
        backend = backend.as_str(),
        path = %path.display(),
        rows = set.len(),
        "wrote sample set"
    );
    Ok(path)
}
