// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Placement decision for the next plot.
//!
//! [`Scheduler::can_create`] is the whole policy: given the current
//! config, the active set, and the clock, either pick a
//! (target, scratch) directory pair or say why not. Its only side
//! effects are on its own round-robin cursors and pacing timestamp;
//! launching is the caller's job.

use std::path::Path;

use plotherd_core::{format_timestamp, Config, PLOT_BYTES};
use thiserror::Error;

use crate::disk::DiskProbe;
use crate::supervisor::ActiveMap;

const MINUTE_MS: u64 = 60_000;

/// Why the scheduler declined to place a plot. Not failures; the
/// `Display` strings are surfaced verbatim as the supervisor status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Veto {
    #[error("configuration lacks TempDirectory or TargetDirectory")]
    MissingDirectories,

    #[error("waiting until {until}")]
    Pacing { until: String },

    #[error("running {running}/{max} plots")]
    ParallelLimit { running: usize, max: usize },

    #[error("staggering start until {until}")]
    Staggering { until: String },

    #[error("too many active plots in phase 1")]
    Phase1Limit,

    #[error("skipping [{dir}], too many temp plots")]
    TempLimit { dir: String },

    #[error("skipping [{dir}], too many active plots")]
    TargetLimit { dir: String },

    #[error("skipping [{dir}], not enough space")]
    NoSpace { dir: String },
}

/// A successful placement: where the next plot writes and lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub target_dir: String,
    pub plot_dir: String,
}

/// Round-robin cursors and pacing state. Persistent across ticks;
/// the pacing timestamp is zeroed when a new config loads.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_temp: usize,
    next_target: usize,
    earliest_next_launch_ms: u64,
}

impl Scheduler {
    /// Decide whether a plot may launch now, and where.
    ///
    /// The checks run in a fixed order; earlier vetoes hide later ones.
    /// One full cycle through the target pool costs a staggering pause;
    /// the temp cursor wraps silently, which also covers a reload that
    /// shrank the temp pool under it.
    pub fn can_create(
        &mut self,
        config: &Config,
        active: &ActiveMap,
        probe: &dyn DiskProbe,
        now_ms: u64,
    ) -> Result<Placement, Veto> {
        if config.temp_directory.is_empty() || config.target_directory.is_empty() {
            return Err(Veto::MissingDirectories);
        }

        if now_ms < self.earliest_next_launch_ms {
            return Err(Veto::Pacing { until: format_timestamp(self.earliest_next_launch_ms) });
        }

        let max = config.number_of_parallel_plots;
        if max > 0 && active.len() >= max {
            return Err(Veto::ParallelLimit { running: active.len(), max });
        }

        if self.next_target >= config.target_directory.len() {
            self.next_target = 0;
            self.earliest_next_launch_ms = now_ms + config.staggering_delay * MINUTE_MS;
            return Err(Veto::Staggering {
                until: format_timestamp(self.earliest_next_launch_ms),
            });
        }

        if self.next_temp >= config.temp_directory.len() {
            self.next_temp = 0;
        }

        if config.max_active_plot_per_phase1 > 0 {
            let in_phase1 = active
                .values()
                .filter(|r| matches!(r.read().current_phase(), Some(p) if p <= 1))
                .count();
            if in_phase1 >= config.max_active_plot_per_phase1 {
                return Err(Veto::Phase1Limit);
            }
        }

        let plot_dir = config.temp_directory[self.next_temp].clone();
        self.next_temp += 1;
        if self.next_temp >= config.temp_directory.len() {
            self.next_temp = 0;
        }

        if config.max_active_plot_per_temp > 0 {
            let on_temp = active.values().filter(|r| r.read().plot_dir == plot_dir).count();
            if on_temp >= config.max_active_plot_per_temp {
                return Err(Veto::TempLimit { dir: plot_dir });
            }
        }

        let target_dir = config.target_directory[self.next_target].clone();
        self.next_target += 1;

        let on_target = active.values().filter(|r| r.read().target_dir == target_dir).count();
        if config.max_active_plot_per_target > 0
            && on_target >= config.max_active_plot_per_target
        {
            return Err(Veto::TargetLimit { dir: target_dir });
        }

        self.earliest_next_launch_ms = now_ms + config.delays_between_plot * MINUTE_MS;

        if config.disk_space_check {
            let needed = (on_target as u64 + 1) * PLOT_BYTES;
            if needed > probe.available_bytes(Path::new(&target_dir)) {
                return Err(Veto::NoSpace { dir: target_dir });
            }
        }

        Ok(Placement { target_dir, plot_dir })
    }

    /// Forget the pacing timestamp. Called when a new config loads; a
    /// policy change invalidates delays derived from the old one.
    pub fn reset_pacing(&mut self) {
        self.earliest_next_launch_ms = 0;
    }

    /// Pacing floor in epoch milliseconds (0 = none).
    pub fn earliest_next_launch_ms(&self) -> u64 {
        self.earliest_next_launch_ms
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
