// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log pump: one per child stream.
//!
//! Reads lines, feeds them through the record's line observer, and
//! tees them into the per-plot save-log once the plot's external id is
//! known. stdout and stderr pumps run concurrently; the record's
//! writer lock serializes their mutations.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use plotherd_core::Clock;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, info, warn};

use crate::supervisor::SharedRecord;

/// Full-log sink for one plot, shared by both pumps.
///
/// Closed until the child announces its id (the file is named after
/// it); opening replays the tail so the log starts from the beginning
/// of what the supervisor retained.
pub(crate) struct SaveLog {
    file: Mutex<Option<File>>,
}

impl SaveLog {
    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self { file: Mutex::new(None) })
    }

    fn open(&self, dir: &str, external_id: &str, tail: &std::collections::VecDeque<String>) {
        let path = Path::new(dir).join(format!("plotng_log_{external_id}.txt"));
        if let Err(e) = fs::create_dir_all(dir) {
            warn!(dir, error = %e, "cannot create save-log directory");
            return;
        }
        let mut file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot open save-log file");
                return;
            }
        };
        for line in tail {
            let _ = writeln!(file, "{line}");
        }
        info!(path = %path.display(), "saving plot log");
        *self.file.lock() = Some(file);
    }

    fn append(&self, line: &str) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = writeln!(file, "{line}");
        }
    }
}

/// Pump one child stream into the record until EOF.
pub(crate) async fn run<R, C>(
    stream: R,
    record: SharedRecord,
    clock: C,
    save_log: Arc<SaveLog>,
    show_log: bool,
) where
    R: AsyncRead + Unpin,
    C: Clock,
{
    let mut lines = BufReader::new(stream).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "plotter stream closed unexpectedly");
                break;
            }
        };

        let now = clock.epoch_ms();
        let id_discovered = {
            let mut rec = record.write();
            let discovered = rec.observe_line(&line, now);
            if show_log {
                info!(plot_id = rec.plot_id, "{line}");
            } else {
                debug!(plot_id = rec.plot_id, "{line}");
            }
            discovered
        };

        if id_discovered {
            let (dir, external_id, tail) = {
                let rec = record.read();
                (rec.save_log_dir.clone(), rec.external_id.clone(), rec.tail.clone())
            };
            if !dir.is_empty() {
                // The discovery line itself is already in the tail.
                save_log.open(&dir, &external_id, &tail);
            }
        } else {
            save_log.append(&line);
        }
    }
}

#[cfg(test)]
#[path = "pump_tests.rs"]
mod tests;
