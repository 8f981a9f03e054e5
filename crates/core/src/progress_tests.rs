// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashSet;
use yare::parameterized;

#[parameterized(
    compute_first = { "Computing table 1", "1%" },
    compute_mid = { "Computing table 5", "28%" },
    compute_last = { "Computing table 7", "42%" },
    backprop = { "Backpropagating on table 4", "55%" },
    compress = { "Compressing tables 5 and 6", "92%" },
    checkpoint = { "Write checkpoint tables", "100%" },
)]
fn marker_maps_to_percent(marker: &str, pct: &str) {
    assert_eq!(progress_for_line(marker), Some(pct));
}

#[test]
fn marker_is_found_mid_line() {
    let line = "2021-04-30T01:02:03 Computing table 5 with k=32";
    assert_eq!(progress_for_line(line), Some("28%"));
}

#[test]
fn unknown_line_has_no_progress() {
    assert_eq!(progress_for_line("Starting phase 2/4"), None);
    assert_eq!(progress_for_line(""), None);
}

#[test]
fn table_is_a_function() {
    // Each marker appears exactly once, so "last hit wins" can never
    // produce two different percentages for the same line.
    let markers: HashSet<&str> = PROGRESS_TABLE.iter().map(|(m, _)| *m).collect();
    assert_eq!(markers.len(), PROGRESS_TABLE.len());
}

#[test]
fn each_marker_matches_only_itself() {
    for (marker, pct) in PROGRESS_TABLE {
        assert_eq!(progress_for_line(marker), Some(pct), "marker {marker:?}");
    }
}
