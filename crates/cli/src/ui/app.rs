// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! UI state: the merged view plus row selection.
//!
//! Selection is keyed by (host, plot id), not row index, so it stays on
//! the same plot while rows re-sort between polls and while a plot
//! moves from the active table to the archive.

use plotherd_core::{PlotRecord, PlotState};

use crate::aggregate::{ClusterView, PlotRow};
use crate::poll::{HostUpdate, KillRequest};

pub struct App {
    pub view: ClusterView,
    selected: Option<(String, i64)>,
}

impl App {
    pub fn new(hosts: &[String]) -> Self {
        Self { view: ClusterView::new(hosts), selected: None }
    }

    pub fn apply(&mut self, update: HostUpdate) {
        self.view.apply(update);
    }

    /// All plot rows in display order: every active plot, then the
    /// archive.
    pub fn rows(&self) -> Vec<PlotRow> {
        let mut rows = self.view.active_rows();
        rows.extend(self.view.archived_rows());
        rows
    }

    /// Index of the selected plot in [`Self::rows`], if it is still
    /// listed.
    pub fn selected_index(&self) -> Option<usize> {
        let (host, plot_id) = self.selected.as_ref()?;
        self.rows()
            .iter()
            .position(|row| &row.host == host && row.record.plot_id == *plot_id)
    }

    pub fn select_next(&mut self) {
        self.select_offset(1);
    }

    pub fn select_prev(&mut self) {
        self.select_offset(-1);
    }

    fn select_offset(&mut self, delta: isize) {
        let rows = self.rows();
        if rows.is_empty() {
            self.selected = None;
            return;
        }
        let next = match self.selected_index() {
            Some(current) => {
                (current as isize + delta).clamp(0, rows.len() as isize - 1) as usize
            }
            None => 0,
        };
        self.selected = Some((rows[next].host.clone(), rows[next].record.plot_id));
    }

    /// The record under the cursor, resolved against the latest
    /// snapshots.
    pub fn selected_plot(&self) -> Option<(&str, &PlotRecord)> {
        let (host, plot_id) = self.selected.as_ref()?;
        self.view.find_plot(host, *plot_id).map(|record| (host.as_str(), record))
    }

    /// A kill order for the selected plot, if it is still running and
    /// has announced the external id the DELETE verb needs.
    pub fn kill_request(&self) -> Option<KillRequest> {
        let (host, record) = self.selected_plot()?;
        if record.state != PlotState::Running || record.external_id.is_empty() {
            return None;
        }
        Some(KillRequest { host: host.to_string(), external_id: record.external_id.clone() })
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
