// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The supervisor: shared state and the periodic scheduling tick.
//!
//! All mutable supervisor state lives behind one lock, taken once per
//! tick across the whole reload-decide-launch-sweep sequence and
//! briefly by the HTTP handlers. Each plot record has its own
//! reader/writer lock because two log pumps and the snapshot encoder
//! contend on it.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use parking_lot::{Mutex, RwLock};
use plotherd_core::{Clock, Config, PlotRecord, PlotState};
use plotherd_wire::Snapshot;
use tracing::{info, warn};

use crate::config_watch::{ConfigWatcher, ReloadOutcome};
use crate::disk::DiskProbe;
use crate::plotter;
use crate::scheduler::Scheduler;

/// Interval between scheduling ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(60);

/// A plot record shared between its launcher task, the two log pumps,
/// and snapshot readers.
pub type SharedRecord = Arc<RwLock<PlotRecord>>;

/// Active plots by supervisor-unique plot id.
pub type ActiveMap = HashMap<i64, SharedRecord>;

/// Everything the supervisor mutates, under one lock.
#[derive(Default)]
pub struct SupervisorState {
    pub active: ActiveMap,
    /// Completed records, append-only for the supervisor's lifetime.
    pub archive: Vec<PlotRecord>,
    pub scheduler: Scheduler,
    /// Outcome of the latest scheduling decision, human-readable.
    pub last_status: String,
}

struct Shared {
    state: Mutex<SupervisorState>,
    config: ConfigWatcher,
    probe: Box<dyn DiskProbe>,
}

/// Handle on one supervisor. Cheap to clone; the HTTP server and the
/// tick loop share it.
#[derive(Clone)]
pub struct Supervisor<C: Clock> {
    shared: Arc<Shared>,
    clock: C,
}

impl<C: Clock + 'static> Supervisor<C> {
    pub fn new(config_path: PathBuf, probe: Box<dyn DiskProbe>, clock: C) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SupervisorState::default()),
                config: ConfigWatcher::new(config_path),
                probe,
            }),
            clock,
        }
    }

    /// Tick every [`TICK_INTERVAL`], starting immediately.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        loop {
            ticker.tick().await;
            if let Some((record, config)) = self.tick() {
                tokio::spawn(plotter::run(record, self.clock.clone(), config.show_plot_log));
            }
        }
    }

    /// One scheduling pass: reload config, decide, create the record,
    /// sweep terminal plots into the archive.
    ///
    /// Returns the record to launch (the caller spawns the launcher
    /// task) so the decision itself stays synchronous and testable.
    pub fn tick(&self) -> Option<(SharedRecord, Arc<Config>)> {
        let reload = self.shared.config.reload();
        let now = self.clock.epoch_ms();

        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        if reload == ReloadOutcome::Reloaded {
            // New policy invalidates pacing derived from the old one.
            state.scheduler.reset_pacing();
        }

        let launch = match self.shared.config.snapshot() {
            None => {
                state.last_status = "no configuration loaded".to_string();
                None
            }
            Some(config) => {
                match state.scheduler.can_create(
                    &config,
                    &state.active,
                    self.shared.probe.as_ref(),
                    now,
                ) {
                    Ok(placement) => {
                        let plot_id = next_plot_id(now, &state.active, &state.archive);
                        let record = PlotRecord::from_config(
                            plot_id,
                            placement.plot_dir,
                            placement.target_dir,
                            &config,
                        );
                        state.last_status = format!(
                            "started plot {plot_id} in [{}] for [{}]",
                            record.plot_dir, record.target_dir
                        );
                        let record = Arc::new(RwLock::new(record));
                        state.active.insert(plot_id, record.clone());
                        Some((record, config))
                    }
                    Err(veto) => {
                        state.last_status = veto.to_string();
                        None
                    }
                }
            }
        };

        // Sweep: terminal plots move from active to the archive.
        let done: Vec<i64> = state
            .active
            .iter()
            .filter(|(_, r)| r.read().is_terminal())
            .map(|(id, _)| *id)
            .collect();
        for id in done {
            if let Some(record) = state.active.remove(&id) {
                let record = record.read().clone();
                info!(plot_id = id, state = %record.state, "plot archived");
                state.archive.push(record);
            }
        }

        info!(active = state.active.len(), status = %state.last_status, "supervisor tick");
        launch
    }

    /// Best-effort kill of an active plot by its external id.
    ///
    /// The record is marked `Killed` before the child is signalled so
    /// the waiter classifies the exit as a kill rather than a crash.
    pub fn kill(&self, external_id: &str) -> bool {
        if external_id.is_empty() {
            return false;
        }
        let pid = {
            let guard = self.shared.state.lock();
            let Some(record) = guard
                .active
                .values()
                .find(|r| r.read().external_id == external_id)
            else {
                return false;
            };
            let mut record = record.write();
            if record.state != PlotState::Running {
                return false;
            }
            record.state = PlotState::Killed;
            record.pid
        };

        match pid {
            Some(pid) => {
                info!(%external_id, pid, "terminating plot on operator request");
                if let Err(e) = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                    warn!(%external_id, pid, error = %e, "failed to signal plotter");
                }
            }
            None => warn!(%external_id, "kill requested before the plotter had a pid"),
        }
        true
    }

    /// Consistent snapshot of supervisor state for the admin endpoint.
    pub fn snapshot(&self) -> Snapshot {
        let config = self.shared.config.snapshot();
        let guard = self.shared.state.lock();

        let mut actives: Vec<PlotRecord> =
            guard.active.values().map(|r| r.read().clone()).collect();
        actives.sort_by_key(|r| r.plot_id);

        let (temp_dirs, target_dirs) = match &config {
            Some(config) => (
                self.probe_dirs(&config.temp_directory),
                self.probe_dirs(&config.target_directory),
            ),
            None => (BTreeMap::new(), BTreeMap::new()),
        };

        Snapshot {
            actives,
            archived: guard.archive.clone(),
            temp_dirs,
            target_dirs,
            status: guard.last_status.clone(),
        }
    }

    fn probe_dirs(&self, dirs: &[String]) -> BTreeMap<String, u64> {
        dirs.iter()
            .map(|d| (d.clone(), self.shared.probe.available_bytes(Path::new(d))))
            .collect()
    }
}

/// Plot ids come from launch epoch seconds; bump while taken so rapid
/// launches stay unique for this supervisor's lifetime.
fn next_plot_id(now_ms: u64, active: &ActiveMap, archive: &[PlotRecord]) -> i64 {
    let mut id = (now_ms / 1000) as i64;
    while active.contains_key(&id) || archive.iter().any(|r| r.plot_id == id) {
        id += 1;
    }
    id
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
