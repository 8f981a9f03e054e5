// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The supervisor state snapshot served on `GET /`.

use std::collections::BTreeMap;

use plotherd_core::PlotRecord;
use serde::{Deserialize, Serialize};

/// Consistent view of one supervisor, taken under its state lock.
///
/// Records carry every [`PlotRecord`] field; child process handles never
/// enter the DTO layer. Directory maps go from path to bytes available.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub actives: Vec<PlotRecord>,
    pub archived: Vec<PlotRecord>,
    pub temp_dirs: BTreeMap<String, u64>,
    pub target_dirs: BTreeMap<String, u64>,
    /// Human-readable outcome of the supervisor's latest scheduling
    /// decision.
    pub status: String,
}

