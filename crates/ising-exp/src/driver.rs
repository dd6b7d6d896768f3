use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use ising_core::{derive_substream_seed, ErrorInfo, IsingError, SampleSet, Sampler};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::adapters::{dwave_sample, sim_anneal};
use crate::canonical::to_canonical_json_bytes;
use crate::hash::stable_hash_string;
use crate::output::{clear_results, write_sample_set, Backend};
use crate::plan::RunPlan;
use crate::problem::{chain_couplings, sweep_fields, zero_field};

/// File name of the sweep report inside the output directory.
pub const REPORT_FILE: &str = "sweep_report.json";

/// Outcome of one field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepJobReport {
    /// 1-based position in the sweep, as used in file names.
    pub index: usize,
    /// Field strength applied to every node.
    pub field: f64,
    /// Seed handed to the local annealer.
    pub seed: u64,
    /// Result file names, relative to the output directory.
    pub files: Vec<String>,
    /// Lowest energy seen per backend.
    pub lowest_energies: BTreeMap<String, f64>,
}

/// Aggregate sweep report persisted next to the result files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// SHA-256 of the canonical plan.
    pub plan_hash: String,
    /// Master seed the per-job seeds derive from, drawn when the plan has none.
    pub seed: u64,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// One entry per field value, in sweep order.
    pub jobs: Vec<SweepJobReport>,
    /// Job, file and backend counts.
    #[serde(default)]
    pub metrics: Value,
}

/// Samples the zero-field chain once per enabled backend.
///
/// Writes `neal_output.<ext>` and `dwave_output.<ext>` without clearing
/// anything first.
pub fn run_single(
    plan: &RunPlan,
    local: &dyn Sampler,
    remote: Option<&dyn Sampler>,
) -> Result<Vec<PathBuf>, IsingError> {
    let remote = resolve_remote(plan, remote)?;
    let h = zero_field();
    let j = chain_couplings();
    let mut files = Vec::new();
    if plan.uses(Backend::Neal) {
        let set = sim_anneal(local, &h, &j, plan.local_reads, plan.seed)?;
        files.push(persist(plan, Backend::Neal, None, &set)?);
    }
    if let Some(remote) = remote {
        let set = dwave_sample(remote, &h, &j, plan.offset, plan.remote_reads, &plan.label)?;
        files.push(persist(plan, Backend::Dwave, None, &set)?);
    }
    Ok(files)
}

/// Runs both backends over every field value of the plan.
///
/// Job seeds derive from the plan seed, or from a freshly drawn master seed
/// that the report records. Existing `*.<ext>` files in the output directory are removed first. A
/// failing job aborts the sweep; files written before it remain.
pub fn run_sweep(
    plan: &RunPlan,
    local: &dyn Sampler,
    remote: Option<&dyn Sampler>,
) -> Result<SweepReport, IsingError> {
    let remote = resolve_remote(plan, remote)?;
    let plan_hash = stable_hash_string(plan)?;
    let master_seed = plan.seed.unwrap_or_else(rand::random::<u64>);
    clear_results(&plan.out_dir, plan.extension())?;
    fs::create_dir_all(&plan.out_dir)
        .map_err(|err| IsingError::io("output-dir", err, &plan.out_dir))?;

    let j = chain_couplings();
    let fields = sweep_fields(&plan.field_values);
    let mut jobs = Vec::with_capacity(fields.len());
    for (idx, (h, &field)) in fields.iter().zip(&plan.field_values).enumerate() {
        let index = idx + 1;
        let seed = derive_substream_seed(master_seed, idx as u64);
        info!(index, total = fields.len(), field, seed, "sweep iteration");

        let mut files = Vec::new();
        let mut lowest_energies = BTreeMap::new();
        if plan.uses(Backend::Neal) {
            let set = sim_anneal(local, h, &j, plan.local_reads, Some(seed))?;
            record_lowest(&mut lowest_energies, Backend::Neal, &set);
            files.push(file_name(persist(plan, Backend::Neal, Some(index), &set)?));
        }
        if let Some(remote) = remote {
            let set = dwave_sample(remote, h, &j, plan.offset, plan.remote_reads, &plan.label)?;
            record_lowest(&mut lowest_energies, Backend::Dwave, &set);
            files.push(file_name(persist(plan, Backend::Dwave, Some(index), &set)?));
        }
        jobs.push(SweepJobReport {
            index,
            field,
            seed,
            files,
            lowest_energies,
        });
    }

    let metrics = json!({
        "jobs": jobs.len(),
        "files": jobs.iter().map(|job| job.files.len()).sum::<usize>(),
        "backends": plan.backends,
    });
    let report = SweepReport {
        plan_hash,
        seed: master_seed,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        jobs,
        metrics,
    };
    let path = plan.out_dir.join(REPORT_FILE);
    let bytes = to_canonical_json_bytes(&report)?;
    fs::write(&path, bytes).map_err(|err| IsingError::io("report-write", err, &path))?;
    info!(path = %path.display(), "wrote sweep report");
    Ok(report)
}

fn resolve_remote<'a>(
    plan: &RunPlan,
    remote: Option<&'a dyn Sampler>,
) -> Result<Option<&'a dyn Sampler>, IsingError> {
    plan.validate()?;
    if !plan.uses(Backend::Dwave) {
        return Ok(None);
    }
    remote.map(Some).ok_or_else(|| {
        IsingError::Config(
            ErrorInfo::new("backend-unavailable", "remote backend enabled but not connected")
                .with_hint("pass --local-only or set the solver API token"),
        )
    })
}

fn persist(
    plan: &RunPlan,
    backend: Backend,
    index: Option<usize>,
    set: &SampleSet,
) -> Result<PathBuf, IsingError> {
    write_sample_set(&plan.out_dir, backend, index, plan.extension(), set, plan.format)
}

fn record_lowest(into: &mut BTreeMap<String, f64>, backend: Backend, set: &SampleSet) {
    if let Some(best) = set.lowest() {
        into.insert(backend.as_str().to_string(), best.energy);
    }
}

fn file_name(path: PathBuf) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
