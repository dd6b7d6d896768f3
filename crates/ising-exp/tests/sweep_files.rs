use std::cell::Cell;
use std::fs;
use std::path::Path;

use ising_core::{BinaryQuadraticModel, IsingError, SampleParams, SampleRecord, SampleSet, Sampler};
use ising_exp::{
    clear_results, from_json_slice, run_single, run_sweep, stable_hash_string, Backend, RunPlan,
    SweepReport, TableFormat, REPORT_FILE,
};
use ising_sa::SimulatedAnnealingSampler;
use tempfile::tempdir;

/// Remote stand-in returning the exact ground state as a single aggregated row.
#[derive(Default)]
struct ExactRemote {
    calls: Cell<usize>,
}

impl Sampler for ExactRemote {
    fn name(&self) -> &str {
        "dwave"
    }

    fn sample(
        &self,
        bqm: &BinaryQuadraticModel,
        params: &SampleParams,
    ) -> Result<SampleSet, IsingError> {
        self.calls.set(self.calls.get() + 1);
        assert_eq!(params.label.as_deref(), Some("ising-sim"));
        let variables = bqm.variables();
        let best = (0u32..1 << variables.len())
            .map(|mask| {
                let spins: Vec<i8> = (0..variables.len())
                    .map(|i| if mask >> i & 1 == 1 { 1 } else { -1 })
                    .collect();
                let energy = bqm.energy_of(&variables, &spins).unwrap();
                (spins, energy)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap();
        SampleSet::new(
            variables,
            vec![SampleRecord {
                sample: best.0,
                energy: best.1,
                num_occurrences: params.num_reads as u64,
            }],
        )
    }
}

fn plan_in(dir: &Path) -> RunPlan {
    RunPlan {
        out_dir: dir.to_path_buf(),
        seed: Some(2022),
        remote_reads: 50,
        ..RunPlan::default()
    }
}

fn names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn full_sweep_writes_one_pair_per_field_value() {
    let dir = tempdir().unwrap();
    let plan = plan_in(dir.path());
    let remote = ExactRemote::default();
    let report = run_sweep(&plan, &SimulatedAnnealingSampler::default(), Some(&remote)).unwrap();

    let results: Vec<String> = names(dir.path())
        .into_iter()
        .filter(|name| name.ends_with(".txt"))
        .collect();
    assert_eq!(results.len(), 2 * plan.field_values.len());
    assert!(results.contains(&"neal_output_1.txt".to_string()));
    assert!(results.contains(&"dwave_output_10.txt".to_string()));
    assert_eq!(remote.calls.get(), plan.field_values.len());
    assert_eq!(report.jobs.len(), plan.field_values.len());
    assert_eq!(report.jobs[0].lowest_energies["dwave"], -2.0);

    let table = fs::read_to_string(dir.path().join("dwave_output_1.txt")).unwrap();
    assert!(table.ends_with("['SPIN', 1 rows, 50 samples, 3 variables]\n"));
}

#[test]
fn sweep_clears_only_matching_results() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("stale.txt"), "old").unwrap();
    fs::write(dir.path().join("notes.md"), "keep").unwrap();
    fs::create_dir(dir.path().join("archive.txt")).unwrap();
    fs::write(dir.path().join("archive.txt").join("inner.txt"), "keep").unwrap();

    let plan = plan_in(dir.path()).local_only();
    run_sweep(&plan, &SimulatedAnnealingSampler::default(), None).unwrap();

    let present = names(dir.path());
    assert!(!present.contains(&"stale.txt".to_string()));
    assert!(present.contains(&"notes.md".to_string()));
    assert!(dir.path().join("archive.txt").join("inner.txt").exists());
    assert!(present.contains(&REPORT_FILE.to_string()));
    assert_eq!(
        present.iter().filter(|name| name.starts_with("neal_output_")).count(),
        plan.field_values.len()
    );
}

#[test]
fn clear_results_reports_removed_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.csv"), "").unwrap();
    fs::write(dir.path().join("b.txt"), "").unwrap();
    let removed = clear_results(dir.path(), "csv").unwrap();
    assert_eq!(removed, vec![dir.path().join("a.csv")]);
    assert!(dir.path().join("b.txt").exists());
    assert!(clear_results(&dir.path().join("missing"), "csv").unwrap().is_empty());
}

#[test]
fn seeded_sweeps_are_reproducible() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    let sampler = SimulatedAnnealingSampler::default();
    let a = run_sweep(&plan_in(first.path()).local_only(), &sampler, None).unwrap();
    let b = run_sweep(&plan_in(second.path()).local_only(), &sampler, None).unwrap();

    assert_eq!(a.jobs, b.jobs);
    for job in &a.jobs {
        let name = &job.files[0];
        assert_eq!(
            fs::read_to_string(first.path().join(name)).unwrap(),
            fs::read_to_string(second.path().join(name)).unwrap()
        );
    }

    let bytes = fs::read(first.path().join(REPORT_FILE)).unwrap();
    let stored: SweepReport = from_json_slice(&bytes).unwrap();
    assert_eq!(stored.plan_hash, a.plan_hash);
    assert_eq!(stored.plan_hash.len(), 64);
    assert_eq!(stored.jobs.len(), a.jobs.len());
    assert_eq!(stored.jobs[3].files, a.jobs[3].files);
}

#[test]
fn unseeded_sweep_records_the_seed_it_drew() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    let sampler = SimulatedAnnealingSampler::default();
    let unseeded = RunPlan {
        seed: None,
        ..plan_in(first.path())
    };
    let drawn = run_sweep(&unseeded.local_only(), &sampler, None).unwrap();

    let replay = RunPlan {
        seed: Some(drawn.seed),
        ..plan_in(second.path())
    };
    let replayed = run_sweep(&replay.local_only(), &sampler, None).unwrap();
    assert_eq!(drawn.jobs, replayed.jobs);
    assert_eq!(
        fs::read_to_string(first.path().join("neal_output_1.txt")).unwrap(),
        fs::read_to_string(second.path().join("neal_output_1.txt")).unwrap()
    );
}

#[test]
fn empty_sweep_writes_a_report_into_a_new_directory() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("fresh");
    let plan = RunPlan {
        field_values: Vec::new(),
        ..plan_in(&out)
    }
    .local_only();
    let report = run_sweep(&plan, &SimulatedAnnealingSampler::default(), None).unwrap();
    assert!(report.jobs.is_empty());
    assert_eq!(names(&out), vec![REPORT_FILE.to_string()]);
}

#[test]
fn plan_hash_tracks_plan_contents() {
    let dir = tempdir().unwrap();
    let plan = plan_in(dir.path());
    let same = stable_hash_string(&plan_in(dir.path())).unwrap();
    assert_eq!(stable_hash_string(&plan).unwrap(), same);
    let reseeded = RunPlan {
        seed: Some(1),
        ..plan
    };
    assert_ne!(stable_hash_string(&reseeded).unwrap(), same);
}

#[test]
fn remote_backend_without_sampler_fails_before_touching_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("stale.txt"), "old").unwrap();
    let err = run_sweep(&plan_in(dir.path()), &SimulatedAnnealingSampler::default(), None)
        .unwrap_err();
    assert_eq!(err.info().code, "backend-unavailable");
    assert!(dir.path().join("stale.txt").exists());
}

#[test]
fn single_run_writes_unindexed_files() {
    let dir = tempdir().unwrap();
    let plan = RunPlan {
        format: TableFormat::Csv,
        extension: "csv".to_string(),
        ..plan_in(dir.path())
    };
    let remote = ExactRemote::default();
    let files = run_single(&plan, &SimulatedAnnealingSampler::default(), Some(&remote)).unwrap();
    assert_eq!(
        files,
        vec![
            dir.path().join("neal_output.csv"),
            dir.path().join("dwave_output.csv")
        ]
    );
    let csv = fs::read_to_string(&files[1]).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("0,1,2,energy,num_occurrences"));
    let row = lines.next().unwrap();
    assert!(row == "1,-1,1,-2,50" || row == "-1,1,-1,-2,50", "{row}");
    assert!(plan.uses(Backend::Neal));
}
