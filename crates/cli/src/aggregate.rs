// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Merge per-host snapshots into the tables the UI draws.
//!
//! Pure bookkeeping over decoded snapshots; the network side only
//! feeds [`ClusterView::apply`]. A host that stops answering keeps its
//! last good snapshot on display with the error alongside.

use std::collections::BTreeMap;

use plotherd_core::{PlotRecord, PlotState};
use plotherd_wire::Snapshot;

use crate::poll::HostUpdate;

/// Last known state of one supervisor.
#[derive(Debug, Default)]
pub struct HostState {
    pub snapshot: Option<Snapshot>,
    pub last_error: Option<String>,
}

/// All supervisors, merged for display.
#[derive(Debug, Default)]
pub struct ClusterView {
    hosts: BTreeMap<String, HostState>,
}

/// One plot row: a record plus the host it came from.
#[derive(Debug, Clone)]
pub struct PlotRow {
    pub host: String,
    pub record: PlotRecord,
}

/// One directory row for the space tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirRow {
    pub host: String,
    pub dir: String,
    pub available: u64,
}

/// Archived-plot aggregates for one target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirStats {
    pub host: String,
    pub dir: String,
    pub finished: usize,
    pub failed: usize,
    /// Average duration of phases 1..4, over cleanly finished plots
    /// with complete phase stamps.
    pub avg_phase_ms: [u64; 4],
}

impl ClusterView {
    /// Pre-seed every polled host so tables list them before the first
    /// answer arrives.
    pub fn new(hosts: &[String]) -> Self {
        let mut view = Self::default();
        for host in hosts {
            view.hosts.entry(host.clone()).or_default();
        }
        view
    }

    pub fn apply(&mut self, update: HostUpdate) {
        match update {
            HostUpdate::Snapshot { host, snapshot } => {
                let state = self.hosts.entry(host).or_default();
                state.snapshot = Some(snapshot);
                state.last_error = None;
            }
            HostUpdate::Error { host, message } => {
                // Keep the previous snapshot; only the error changes.
                self.hosts.entry(host).or_default().last_error = Some(message);
            }
        }
    }

    pub fn active_rows(&self) -> Vec<PlotRow> {
        self.plot_rows(|s| &s.actives)
    }

    pub fn archived_rows(&self) -> Vec<PlotRow> {
        self.plot_rows(|s| &s.archived)
    }

    fn plot_rows(&self, pick: impl Fn(&Snapshot) -> &Vec<PlotRecord>) -> Vec<PlotRow> {
        self.hosts
            .iter()
            .filter_map(|(host, state)| state.snapshot.as_ref().map(|s| (host, s)))
            .flat_map(|(host, snapshot)| {
                pick(snapshot)
                    .iter()
                    .map(move |record| PlotRow { host: host.clone(), record: record.clone() })
            })
            .collect()
    }

    pub fn temp_dir_rows(&self) -> Vec<DirRow> {
        self.dir_rows(|s| &s.temp_dirs)
    }

    pub fn target_dir_rows(&self) -> Vec<DirRow> {
        self.dir_rows(|s| &s.target_dirs)
    }

    fn dir_rows(&self, pick: impl Fn(&Snapshot) -> &BTreeMap<String, u64>) -> Vec<DirRow> {
        self.hosts
            .iter()
            .filter_map(|(host, state)| state.snapshot.as_ref().map(|s| (host, s)))
            .flat_map(|(host, snapshot)| {
                pick(snapshot).iter().map(move |(dir, available)| DirRow {
                    host: host.clone(),
                    dir: dir.clone(),
                    available: *available,
                })
            })
            .collect()
    }

    /// One status line per host: the poll error if the host is dark,
    /// otherwise the supervisor's own scheduling status.
    pub fn statuses(&self) -> Vec<(String, String)> {
        self.hosts
            .iter()
            .map(|(host, state)| {
                let line = match (&state.last_error, &state.snapshot) {
                    (Some(err), _) => err.clone(),
                    (None, Some(snapshot)) => snapshot.status.clone(),
                    (None, None) => "waiting for first poll".to_string(),
                };
                (host.clone(), line)
            })
            .collect()
    }

    /// Find a plot on a host by supervisor plot id, active or archived.
    /// The id is stable across the active→archived move, so selections
    /// survive it.
    pub fn find_plot(&self, host: &str, plot_id: i64) -> Option<&PlotRecord> {
        let snapshot = self.hosts.get(host)?.snapshot.as_ref()?;
        snapshot
            .actives
            .iter()
            .chain(snapshot.archived.iter())
            .find(|r| r.plot_id == plot_id)
    }

    /// Per-target-directory success/failure counters and average phase
    /// durations, from the archives of every host.
    pub fn target_stats(&self) -> Vec<DirStats> {
        struct Acc {
            finished: usize,
            failed: usize,
            sums: [u64; 4],
            timed: u64,
        }
        let mut by_dir: BTreeMap<(String, String), Acc> = BTreeMap::new();

        for (host, state) in &self.hosts {
            let Some(snapshot) = &state.snapshot else { continue };
            for record in &snapshot.archived {
                let acc = by_dir
                    .entry((host.clone(), record.target_dir.clone()))
                    .or_insert(Acc { finished: 0, failed: 0, sums: [0; 4], timed: 0 });
                match record.state {
                    PlotState::Finished => acc.finished += 1,
                    PlotState::Errored | PlotState::Killed => acc.failed += 1,
                    PlotState::Running => {}
                }
                if let Some(durations) = phase_durations(record) {
                    for (sum, d) in acc.sums.iter_mut().zip(durations) {
                        *sum += d;
                    }
                    acc.timed += 1;
                }
            }
        }

        by_dir
            .into_iter()
            .map(|((host, dir), acc)| DirStats {
                host,
                dir,
                finished: acc.finished,
                failed: acc.failed,
                avg_phase_ms: if acc.timed == 0 {
                    [0; 4]
                } else {
                    acc.sums.map(|s| s / acc.timed)
                },
            })
            .collect()
    }
}

/// Per-phase durations of a cleanly finished plot. `None` unless the
/// plot finished and stamped every phase boundary.
fn phase_durations(record: &PlotRecord) -> Option<[u64; 4]> {
    if record.state != PlotState::Finished {
        return None;
    }
    let [t1, t2, t3] = record.phase_times_ms;
    if t1 == 0 || t2 == 0 || t3 == 0 || record.end_time_ms == 0 {
        return None;
    }
    Some([
        t1.saturating_sub(record.start_time_ms),
        t2.saturating_sub(t1),
        t3.saturating_sub(t2),
        record.end_time_ms.saturating_sub(t3),
    ])
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
