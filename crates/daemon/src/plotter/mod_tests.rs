// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn record() -> PlotRecord {
    PlotRecord {
        plot_id: 7,
        plot_dir: "/scratch/a".into(),
        target_dir: "/farm/1".into(),
        ..PlotRecord::default()
    }
}

#[test]
fn minimal_record_builds_the_default_invocation() {
    let args = build_args(&record());
    assert_eq!(
        args,
        vec![
            "plots",
            "create",
            "-n1",
            "-k32",
            "-t/scratch/a",
            "-d/farm/1",
            "-b3390",
            "-u128",
        ]
    );
}

#[test]
fn identity_material_becomes_flags() {
    let mut rec = record();
    rec.fingerprint = "314159".into();
    rec.farmer_public_key = "farmerkey".into();
    rec.pool_public_key = "poolkey".into();
    let args = build_args(&rec);
    assert!(args.contains(&"-a314159".to_string()));
    assert!(args.contains(&"-ffarmerkey".to_string()));
    assert!(args.contains(&"-ppoolkey".to_string()));
}

#[test]
fn tuning_knobs_override_defaults() {
    let mut rec = record();
    rec.threads = 6;
    rec.buffers = 8000;
    rec.bucket_size = 64;
    let args = build_args(&rec);
    assert!(args.contains(&"-r6".to_string()));
    assert!(args.contains(&"-b8000".to_string()));
    assert!(args.contains(&"-u64".to_string()));
}

#[parameterized(
    k33 = { 33, "-b7400" },
    k34 = { 34, "-b14800" },
    k35 = { 35, "-b29600" },
)]
fn buffer_default_follows_k(k: u32, expect: &str) {
    let mut rec = record();
    rec.k_size = k;
    let args = build_args(&rec);
    assert!(args.contains(&expect.to_string()), "args: {args:?}");
}

#[test]
fn buffer_flag_is_emitted_exactly_once() {
    let mut rec = record();
    rec.buffers = 6000;
    let args = build_args(&rec);
    let buffer_flags = args.iter().filter(|a| a.starts_with("-b")).count();
    assert_eq!(buffer_flags, 1);
}

#[test]
fn small_k_passes_the_override_flag() {
    let mut rec = record();
    rec.k_size = 25;
    let args = build_args(&rec);
    assert!(args.contains(&"-k25".to_string()));
    assert!(args.contains(&"--override-k".to_string()));

    let standard = build_args(&record());
    assert!(!standard.contains(&"--override-k".to_string()));
}

#[test]
fn optional_flags_stay_off_by_default() {
    let args = build_args(&record());
    assert!(!args.iter().any(|a| a == "-e"));
    assert!(!args.iter().any(|a| a.starts_with("-2")));
    assert!(!args.iter().any(|a| a.starts_with("-r")));
    assert!(!args.iter().any(|a| a.starts_with("-a")));
}

#[test]
fn bitfield_and_phase2_flags_are_honored() {
    let mut rec = record();
    rec.disable_bitfield = true;
    rec.use_target_for_phase2 = true;
    let args = build_args(&rec);
    assert!(args.contains(&"-e".to_string()));
    assert!(args.contains(&"-2/farm/1".to_string()));
}

#[test]
fn cleanup_removes_only_this_plots_tmp_files() {
    let dir = tempfile::tempdir().unwrap();
    let touch = |name: &str| fs::write(dir.path().join(name), b"x").unwrap();
    touch("plot-k32-abc123-1.tmp");
    touch("plot-k32-abc123-2.tmp");
    touch("plot-k32-other999-1.tmp");
    touch("plot-k32-abc123.plot");

    let rec = PlotRecord {
        external_id: "abc123".into(),
        plot_dir: dir.path().to_string_lossy().into_owned(),
        ..PlotRecord::default()
    };
    cleanup(&rec);

    let remaining: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert!(!remaining.contains(&"plot-k32-abc123-1.tmp".to_string()));
    assert!(!remaining.contains(&"plot-k32-abc123-2.tmp".to_string()));
    // Another plot's intermediates and finished plots are not ours to touch.
    assert!(remaining.contains(&"plot-k32-other999-1.tmp".to_string()));
    assert!(remaining.contains(&"plot-k32-abc123.plot".to_string()));
}

#[test]
fn cleanup_without_an_external_id_does_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("anything.tmp"), b"x").unwrap();

    let rec = PlotRecord {
        plot_dir: dir.path().to_string_lossy().into_owned(),
        ..PlotRecord::default()
    };
    cleanup(&rec);
    assert!(dir.path().join("anything.tmp").exists());
}

#[test]
fn cleanup_tolerates_a_missing_scratch_dir() {
    let rec = PlotRecord {
        external_id: "abc".into(),
        plot_dir: "/no/such/scratch".into(),
        ..PlotRecord::default()
    };
    cleanup(&rec);
}
