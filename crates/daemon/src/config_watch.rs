// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mtime-gated configuration reload.
//!
//! The config is an immutable value behind a reader/writer lock:
//! readers clone out an `Arc<Config>` snapshot for the duration of a
//! decision, the reloader swaps the pointer. Any failure keeps the
//! previous config in effect.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use plotherd_core::Config;
use tracing::{info, warn};

/// Result of a reload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// A new config value replaced the old one.
    Reloaded,
    /// Mtime unchanged, file unreadable, or decode failed; the previous
    /// config (possibly none) remains in effect.
    Unchanged,
}

struct WatchState {
    last_mtime: Option<SystemTime>,
    current: Option<Arc<Config>>,
}

/// Watches one JSON config file and hands out snapshots.
pub struct ConfigWatcher {
    path: PathBuf,
    state: RwLock<WatchState>,
}

impl ConfigWatcher {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: RwLock::new(WatchState { last_mtime: None, current: None }),
        }
    }

    /// Re-read the config file if its mtime changed.
    ///
    /// A file with an unchanged mtime short-circuits without reading.
    /// Decode failures are logged and leave both the current config and
    /// the recorded mtime alone, so the operator's fix is picked up on
    /// the next tick.
    pub fn reload(&self) -> ReloadOutcome {
        let mtime = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to stat config file");
                return ReloadOutcome::Unchanged;
            }
        };
        if self.state.read().last_mtime == Some(mtime) {
            return ReloadOutcome::Unchanged;
        }

        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to open config file");
                return ReloadOutcome::Unchanged;
            }
        };
        let config: Config = match serde_json::from_slice(&raw) {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to parse config file, check it for mistakes"
                );
                return ReloadOutcome::Unchanged;
            }
        };

        if !config.has_identity() {
            warn!("config has no fingerprint or farmer/pool key; plots will be unusable");
        }

        let mut state = self.state.write();
        state.current = Some(Arc::new(config));
        state.last_mtime = Some(mtime);
        info!("new configuration loaded");
        ReloadOutcome::Reloaded
    }

    /// Consistent snapshot of the current config; `None` until the first
    /// successful load.
    pub fn snapshot(&self) -> Option<Arc<Config>> {
        self.state.read().current.clone()
    }
}

#[cfg(test)]
#[path = "config_watch_tests.rs"]
mod tests;
