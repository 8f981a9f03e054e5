// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plot record: one attempt of the external plotter process.
//!
//! A record is created by the supervisor when a plot is launched,
//! mutated by the launcher task and its two log pumps while the child
//! runs, and frozen once it reaches a terminal state. The log-line
//! observer lives here so the child's line grammar can be tested
//! without a process.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::progress::progress_for_line;

/// Maximum number of child output lines retained per plot.
pub const TAIL_LINES: usize = 20;

const PHASE_PREFIX: &str = "Starting phase ";
const ID_PREFIX: &str = "ID: ";

/// Lifecycle state of a plot attempt.
///
/// `Running` is the only non-terminal state; the other three never
/// regress. `Killed` is latched by the operator before the child is
/// signalled, so the waiter can tell a kill from a crash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotState {
    #[default]
    Running,
    Finished,
    Errored,
    Killed,
}

impl PlotState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PlotState::Running)
    }
}

crate::simple_display! {
    PlotState {
        Running => "Running",
        Finished => "Finished",
        Errored => "Errored",
        Killed => "Killed",
    }
}

/// One plot attempt, from launch to archive.
///
/// Timestamps are wall-clock epoch milliseconds; zero means "not
/// reached". Plotter tuning knobs are copied from the config at launch
/// so a hot reload never changes an in-flight plot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotRecord {
    /// Supervisor-unique id, derived from launch epoch seconds.
    pub plot_id: i64,
    pub start_time_ms: u64,
    pub end_time_ms: u64,
    /// Instant each of phases 1..3 completed (phase 4 ends at `end_time_ms`).
    pub phase_times_ms: [u64; 3],
    /// Scratch directory the plotter writes intermediates to.
    pub plot_dir: String,
    /// Final plot destination.
    pub target_dir: String,
    pub fingerprint: String,
    pub farmer_public_key: String,
    pub pool_public_key: String,
    /// Hex plot id emitted by the child via its `ID:` line; empty until
    /// parsed. This is the plot's stable external identity.
    pub external_id: String,
    /// Phase marker as printed by the child, e.g. `2/4`.
    pub phase: String,
    /// Derived progress percentage string, e.g. `28%`.
    pub progress: String,
    pub state: PlotState,
    /// Last [`TAIL_LINES`] lines of child output, oldest first.
    pub tail: VecDeque<String>,
    /// Child pid while running.
    pub pid: Option<u32>,
    pub threads: u32,
    pub buffers: u32,
    pub bucket_size: u32,
    pub k_size: u32,
    pub disable_bitfield: bool,
    pub use_target_for_phase2: bool,
    /// Directory for the full per-plot log (empty = don't save).
    pub save_log_dir: String,
}

impl PlotRecord {
    /// Create a launch-ready record with policy knobs copied out of the
    /// current config.
    pub fn from_config(
        plot_id: i64,
        plot_dir: String,
        target_dir: String,
        config: &Config,
    ) -> Self {
        Self {
            plot_id,
            plot_dir,
            target_dir,
            fingerprint: config.fingerprint.clone(),
            farmer_public_key: config.farmer_public_key.clone(),
            pool_public_key: config.pool_public_key.clone(),
            threads: config.threads,
            buffers: config.buffers,
            bucket_size: config.bucket_size,
            k_size: config.k_size(),
            disable_bitfield: config.disable_bit_field,
            use_target_for_phase2: config.use_target_for_tmp2,
            save_log_dir: config.save_plot_log_dir.clone(),
            state: PlotState::Running,
            ..Self::default()
        }
    }

    /// Observe one line of child output.
    ///
    /// Applies the child's line grammar: `Starting phase X/Y` updates the
    /// phase marker and stamps phase completion times, `ID: <hex>` sets
    /// the external id, progress markers update the percentage, and every
    /// line lands in the bounded tail.
    ///
    /// Returns `true` when this line revealed the external id, so the
    /// caller can open the per-plot save-log.
    pub fn observe_line(&mut self, line: &str, now_ms: u64) -> bool {
        let mut id_discovered = false;

        if let Some(rest) = line.strip_prefix(PHASE_PREFIX) {
            if let Some(marker) = rest.get(..3) {
                self.phase = marker.to_string();
                match marker {
                    "2/4" => self.phase_times_ms[0] = now_ms,
                    "3/4" => self.phase_times_ms[1] = now_ms,
                    "4/4" => self.phase_times_ms[2] = now_ms,
                    _ => {}
                }
            }
        }

        if let Some(rest) = line.strip_prefix(ID_PREFIX) {
            self.external_id = rest.trim_end().to_string();
            id_discovered = !self.external_id.is_empty();
        }

        if let Some(pct) = progress_for_line(line) {
            self.progress = pct.to_string();
        }

        self.tail.push_back(line.to_string());
        while self.tail.len() > TAIL_LINES {
            self.tail.pop_front();
        }

        id_discovered
    }

    /// Integer phase the plot is currently in (the number before `/`).
    /// `None` when the marker is missing or unparseable.
    pub fn current_phase(&self) -> Option<u32> {
        self.phase.split('/').next().and_then(|p| p.parse().ok())
    }

    /// Transition into a terminal state and stamp the end time.
    /// Terminal states are sticky: once set, later transitions are
    /// ignored except that `end_time_ms` is stamped if still zero.
    pub fn complete(&mut self, state: PlotState, now_ms: u64) {
        if !self.state.is_terminal() {
            self.state = state;
        }
        if self.end_time_ms == 0 {
            self.end_time_ms = now_ms;
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Milliseconds the plot has run for (to `now` while running, to
    /// `end_time_ms` once finished).
    pub fn duration_ms(&self, now_ms: u64) -> u64 {
        let end = if self.end_time_ms > 0 { self.end_time_ms } else { now_ms };
        end.saturating_sub(self.start_time_ms)
    }
}

#[cfg(test)]
#[path = "plot_tests.rs"]
mod tests;
