// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! plotherd daemon library.
//!
//! The supervisor proper: policy reload, scheduling decisions, plot
//! process execution, and the HTTP snapshot endpoint. The `plotherdd`
//! binary wires these together.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config_watch;
pub mod disk;
pub mod plotter;
pub mod scheduler;
pub mod server;
pub mod supervisor;

pub use config_watch::{ConfigWatcher, ReloadOutcome};
pub use disk::{DiskProbe, SystemDiskProbe};
pub use scheduler::{Placement, Scheduler, Veto};
pub use supervisor::{Supervisor, SupervisorState};
