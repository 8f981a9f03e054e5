// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor policy configuration.
//!
//! Decoded from the operator's JSON config file. Every key is optional;
//! zero values mean "unlimited" for caps and "use the plotter default"
//! for tuning knobs. The daemon replaces the whole value atomically on
//! reload, so this type stays a plain data value.

use serde::{Deserialize, Serialize};

pub const KIB: u64 = 1024;
pub const GIB: u64 = KIB * KIB * KIB;

/// Bytes a finished plot occupies; the disk-space precheck budgets this
/// much per active plot targeting a directory.
pub const PLOT_BYTES: u64 = 105 * GIB;

/// Hot-reloadable supervisor policy.
///
/// Field names on the wire are the PascalCase keys of the JSON config
/// file format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Config {
    /// Final-plot directory pool, consumed round-robin.
    pub target_directory: Vec<String>,
    /// Scratch directory pool, consumed round-robin.
    pub temp_directory: Vec<String>,
    /// Hard cap on concurrent plots (0 = unlimited).
    pub number_of_parallel_plots: usize,
    pub fingerprint: String,
    pub farmer_public_key: String,
    pub pool_public_key: String,
    /// Plotter threads (0 = plotter default).
    pub threads: u32,
    /// k-size (0 = 32).
    pub plot_size: u32,
    /// Plotter buffer MiB (0 = default derived from k).
    pub buffers: u32,
    /// Plotter bucket count (0 = 128).
    pub bucket_size: u32,
    pub disable_bit_field: bool,
    /// Minutes to pause after a full cycle through the target pool.
    pub staggering_delay: u64,
    /// Log each plot's output lines at info level.
    pub show_plot_log: bool,
    /// Enforce the per-target disk-space precheck.
    pub disk_space_check: bool,
    /// Minutes between any two launches.
    pub delays_between_plot: u64,
    pub max_active_plot_per_target: usize,
    pub max_active_plot_per_temp: usize,
    pub max_active_plot_per_phase1: usize,
    /// Pass the target directory as the plotter's phase-2 scratch.
    pub use_target_for_tmp2: bool,
    /// Directory for full per-plot log files (empty = don't save).
    pub save_plot_log_dir: String,
}

impl Config {
    /// True when at least one piece of identity material is present.
    /// The plotter needs a fingerprint or a farmer/pool key pair to
    /// produce a usable plot.
    pub fn has_identity(&self) -> bool {
        !self.fingerprint.is_empty()
            || !self.farmer_public_key.is_empty()
            || !self.pool_public_key.is_empty()
    }

    /// Effective k-size (0 means the standard 32).
    pub fn k_size(&self) -> u32 {
        if self.plot_size == 0 {
            32
        } else {
            self.plot_size
        }
    }
}

/// Default plotter buffer size in MiB for a given k.
pub fn buffers_for_k(k: u32) -> u32 {
    match k {
        33 => 7400,
        34 => 14800,
        35 => 29600,
        _ => 3390,
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
