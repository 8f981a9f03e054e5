// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-format time and size rendering for status lines and tables.

use chrono::{Local, TimeZone};

/// Render a duration in milliseconds as fixed-width `HH:MM:SS`.
/// Hours widen past two digits for plots that run multi-day.
pub fn format_duration(ms: u64) -> String {
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    format!("{hours:02}:{mins:02}:{secs:02}")
}

/// Render an epoch-millisecond timestamp as local `YYYY-MM-DD HH:MM:SS`.
/// Zero (the "not set" sentinel) renders as `-`.
pub fn format_timestamp(epoch_ms: u64) -> String {
    if epoch_ms == 0 {
        return "-".to_string();
    }
    match Local.timestamp_millis_opt(epoch_ms as i64).single() {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

/// Render a byte count as whole binary gigabytes, e.g. `931 GB`.
pub fn format_gb(bytes: u64) -> String {
    format!("{} GB", bytes / crate::config::GIB)
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
