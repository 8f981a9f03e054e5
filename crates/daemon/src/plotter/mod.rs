// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plot process execution.
//!
//! One launcher task per plot: build the plotter invocation, spawn it
//! with piped stdio, pump both streams through the record's line
//! observer, wait, classify the exit, and clean up partial files on
//! failure. The launcher owns the record's mutation until the terminal
//! state; the supervisor only reads after that.

mod pump;

use std::fs;
use std::process::Stdio;

use plotherd_core::{config::buffers_for_k, Clock, PlotRecord, PlotState};
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::supervisor::SharedRecord;

/// The plotter executable. Plot creation is a subcommand of the chia
/// blockchain CLI.
const PLOTTER_BIN: &str = "chia";

const DEFAULT_BUCKETS: u32 = 128;

/// Build the `plots create` argument vector from a launch-ready record.
///
/// Tuning flags come from the knobs copied out of config at launch;
/// zero-valued knobs fall back to plotter defaults keyed off k where
/// the plotter's own default would be wrong for big plots.
fn build_args(record: &PlotRecord) -> Vec<String> {
    let k = if record.k_size == 0 { 32 } else { record.k_size };
    let mut args = vec![
        "plots".to_string(),
        "create".to_string(),
        "-n1".to_string(),
        format!("-k{k}"),
    ];
    if k < 32 {
        args.push("--override-k".to_string());
    }
    args.push(format!("-t{}", record.plot_dir));
    args.push(format!("-d{}", record.target_dir));
    if !record.fingerprint.is_empty() {
        args.push(format!("-a{}", record.fingerprint));
    }
    if !record.farmer_public_key.is_empty() {
        args.push(format!("-f{}", record.farmer_public_key));
    }
    if !record.pool_public_key.is_empty() {
        args.push(format!("-p{}", record.pool_public_key));
    }
    if record.threads > 0 {
        args.push(format!("-r{}", record.threads));
    }
    let buffers = if record.buffers > 0 { record.buffers } else { buffers_for_k(k) };
    args.push(format!("-b{buffers}"));
    let buckets = if record.bucket_size > 0 { record.bucket_size } else { DEFAULT_BUCKETS };
    args.push(format!("-u{buckets}"));
    if record.disable_bitfield {
        args.push("-e".to_string());
    }
    if record.use_target_for_phase2 {
        args.push(format!("-2{}", record.target_dir));
    }
    args
}

/// Run one plot to completion.
pub async fn run<C: Clock + 'static>(record: SharedRecord, clock: C, show_log: bool) {
    let (plot_id, args) = {
        let mut rec = record.write();
        rec.start_time_ms = clock.epoch_ms();
        (rec.plot_id, build_args(&rec))
    };
    info!(plot_id, ?args, "launching plotter");

    let mut child = match Command::new(PLOTTER_BIN)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            // Nothing was written, so there is nothing to clean up.
            error!(plot_id, error = %e, "failed to start plotter");
            record.write().complete(PlotState::Errored, clock.epoch_ms());
            return;
        }
    };
    record.write().pid = child.id();

    let save_log = pump::SaveLog::shared();
    let mut pumps = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        pumps.push(tokio::spawn(pump::run(
            stdout,
            record.clone(),
            clock.clone(),
            save_log.clone(),
            show_log,
        )));
    }
    if let Some(stderr) = child.stderr.take() {
        pumps.push(tokio::spawn(pump::run(
            stderr,
            record.clone(),
            clock.clone(),
            save_log.clone(),
            show_log,
        )));
    }

    let status = child.wait().await;
    // Drain both streams before classifying, so the tail and phase
    // state are complete when the record turns terminal.
    for pump in pumps {
        let _ = pump.await;
    }

    let now = clock.epoch_ms();
    let cleanup_needed = {
        let mut rec = record.write();
        rec.pid = None;
        match &status {
            Ok(exit) if exit.success() => rec.complete(PlotState::Finished, now),
            Ok(exit) => {
                // An operator kill latched `Killed` before the signal;
                // `complete` keeps it. Anything else is a crash.
                warn!(plot_id, ?exit, "plotter exited abnormally");
                rec.complete(PlotState::Errored, now);
            }
            Err(e) => {
                error!(plot_id, error = %e, "failed to wait on plotter");
                rec.complete(PlotState::Errored, now);
            }
        }
        info!(plot_id, state = %rec.state, "plot finished");
        rec.state != PlotState::Finished
    };

    if cleanup_needed {
        cleanup(&record.read());
    }
}

/// Remove the plotter's partial `.tmp` files from the scratch
/// directory. Only files carrying this plot's external id are touched;
/// the target directory never is.
fn cleanup(record: &PlotRecord) {
    if record.external_id.is_empty() {
        return;
    }
    let entries = match fs::read_dir(&record.plot_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(plot_dir = %record.plot_dir, error = %e, "cleanup could not list scratch dir");
            return;
        }
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.contains(&record.external_id) && name.ends_with(".tmp") {
            match fs::remove_file(entry.path()) {
                Ok(()) => info!(file = %name, "removed partial plot file"),
                Err(e) => warn!(file = %name, error = %e, "failed to remove partial plot file"),
            }
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
