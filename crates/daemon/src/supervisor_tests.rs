// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::disk::FakeDiskProbe;
use plotherd_core::FakeClock;
use std::fs;

// 2021-06-01 00:00:00 UTC
const NOW: u64 = 1_622_505_600_000;

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("config.json");
    fs::write(&path, body).unwrap();
    path
}

fn supervisor(config_path: PathBuf) -> Supervisor<FakeClock> {
    Supervisor::new(config_path, Box::new(FakeDiskProbe::default()), FakeClock::at(NOW))
}

fn supervisor_with_probe(config_path: PathBuf, probe: FakeDiskProbe) -> Supervisor<FakeClock> {
    Supervisor::new(config_path, Box::new(probe), FakeClock::at(NOW))
}

#[test]
fn tick_without_config_reports_status() {
    let dir = tempfile::tempdir().unwrap();
    let sup = supervisor(dir.path().join("missing.json"));

    assert!(sup.tick().is_none());
    assert_eq!(sup.snapshot().status, "no configuration loaded");
}

#[test]
fn tick_launches_and_records_an_active_plot() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"{"TargetDirectory": ["/farm"], "TempDirectory": ["/scratch"], "Fingerprint": "fp"}"#,
    );
    let sup = supervisor(path);

    let (record, config) = sup.tick().unwrap();
    assert_eq!(config.fingerprint, "fp");
    {
        let rec = record.read();
        assert_eq!(rec.state, PlotState::Running);
        assert_eq!(rec.plot_dir, "/scratch");
        assert_eq!(rec.target_dir, "/farm");
        assert_eq!(rec.plot_id, (NOW / 1000) as i64);
    }

    let snapshot = sup.snapshot();
    assert_eq!(snapshot.actives.len(), 1);
    assert!(snapshot.archived.is_empty());
    assert!(snapshot.status.starts_with("started plot"));
}

#[test]
fn plot_ids_stay_unique_within_one_second() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"{"TargetDirectory": ["/farm1", "/farm2"], "TempDirectory": ["/scratch"]}"#,
    );
    let sup = supervisor(path);

    let (first, _) = sup.tick().unwrap();
    let (second, _) = sup.tick().unwrap();
    let a = first.read().plot_id;
    let b = second.read().plot_id;
    assert_eq!(a, (NOW / 1000) as i64);
    assert_eq!(b, a + 1);
}

#[test]
fn scheduler_veto_lands_in_last_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), r#"{"TargetDirectory": ["/farm"]}"#);
    let sup = supervisor(path);

    assert!(sup.tick().is_none());
    assert_eq!(
        sup.snapshot().status,
        "configuration lacks TempDirectory or TargetDirectory"
    );
}

#[test]
fn sweep_moves_terminal_plots_to_the_archive() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"{"TargetDirectory": ["/farm"], "TempDirectory": ["/scratch"]}"#,
    );
    let sup = supervisor(path);

    let (record, _) = sup.tick().unwrap();
    record.write().complete(PlotState::Finished, NOW + 1_000);

    // Stagger veto aside, the next tick sweeps the finished plot.
    sup.tick();

    let snapshot = sup.snapshot();
    assert!(snapshot.actives.is_empty());
    assert_eq!(snapshot.archived.len(), 1);
    let archived = &snapshot.archived[0];
    assert_eq!(archived.state, PlotState::Finished);
    assert!(archived.start_time_ms <= archived.end_time_ms);
}

#[test]
fn active_and_archive_stay_disjoint_across_ticks() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"{"TargetDirectory": ["/farm1", "/farm2"], "TempDirectory": ["/scratch"]}"#,
    );
    let sup = supervisor(path);

    let (first, _) = sup.tick().unwrap();
    first.write().complete(PlotState::Errored, NOW + 10);
    sup.tick();
    sup.tick();

    let snapshot = sup.snapshot();
    for archived in &snapshot.archived {
        assert!(
            !snapshot.actives.iter().any(|a| a.plot_id == archived.plot_id),
            "plot {} is both active and archived",
            archived.plot_id
        );
    }
}

#[test]
fn reload_resets_the_pacing_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"{"TargetDirectory": ["/farm"], "TempDirectory": ["/scratch"], "StaggeringDelay": 60}"#,
    );
    let sup = supervisor(path.clone());

    sup.tick().unwrap();
    // Full target cycle: the stagger veto sets a one-hour floor.
    assert!(sup.tick().is_none());
    assert!(sup.snapshot().status.starts_with("staggering start until"));
    assert!(sup.tick().is_none());
    assert!(sup.snapshot().status.starts_with("waiting until"));

    // Touching the config clears the floor on the next tick.
    fs::write(&path, r#"{"TargetDirectory": ["/farm"], "TempDirectory": ["/scratch"]}"#)
        .unwrap();
    let later = std::time::SystemTime::now() + std::time::Duration::from_secs(30);
    fs::File::options().append(true).open(&path).unwrap().set_modified(later).unwrap();

    assert!(sup.tick().is_some());
}

#[test]
fn kill_marks_the_record_before_any_signal() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"{"TargetDirectory": ["/farm"], "TempDirectory": ["/scratch"]}"#,
    );
    let sup = supervisor(path);

    let (record, _) = sup.tick().unwrap();
    record.write().external_id = "abc123".into();

    assert!(sup.kill("abc123"));
    assert_eq!(record.read().state, PlotState::Killed);

    // Killed is terminal; a second kill is a no-op.
    assert!(!sup.kill("abc123"));
}

#[test]
fn kill_of_unknown_or_empty_id_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"{"TargetDirectory": ["/farm"], "TempDirectory": ["/scratch"]}"#,
    );
    let sup = supervisor(path);
    sup.tick().unwrap();

    assert!(!sup.kill("nope"));
    // A freshly launched plot has an empty external id; an empty DELETE
    // path must not match it.
    assert!(!sup.kill(""));
}

#[test]
fn snapshot_probes_configured_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"{"TargetDirectory": ["/farm"], "TempDirectory": ["/scratch"]}"#,
    );
    let probe = FakeDiskProbe::default().with("/farm", 42).with("/scratch", 7);
    let sup = supervisor_with_probe(path, probe);
    sup.tick();

    let snapshot = sup.snapshot();
    assert_eq!(snapshot.target_dirs.get("/farm"), Some(&42));
    assert_eq!(snapshot.temp_dirs.get("/scratch"), Some(&7));
}

#[test]
fn snapshot_actives_are_sorted_by_plot_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"{"TargetDirectory": ["/f1", "/f2", "/f3"], "TempDirectory": ["/scratch"]}"#,
    );
    let sup = supervisor(path);
    sup.tick().unwrap();
    sup.tick().unwrap();
    sup.tick().unwrap();

    let snapshot = sup.snapshot();
    let ids: Vec<i64> = snapshot.actives.iter().map(|r| r.plot_id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    assert_eq!(ids.len(), 3);
}
