// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use plotherd_wire::Snapshot;

fn record(plot_id: i64, state: PlotState, external_id: &str) -> PlotRecord {
    PlotRecord {
        plot_id,
        state,
        external_id: external_id.into(),
        ..PlotRecord::default()
    }
}

fn app_with(actives: Vec<PlotRecord>, archived: Vec<PlotRecord>) -> App {
    let mut app = App::new(&["a:8484".to_string()]);
    app.apply(HostUpdate::Snapshot {
        host: "a:8484".into(),
        snapshot: Snapshot { actives, archived, ..Snapshot::default() },
    });
    app
}

#[test]
fn selection_starts_on_the_first_row() {
    let mut app = app_with(vec![record(1, PlotState::Running, "x")], vec![]);
    assert_eq!(app.selected_index(), None);
    app.select_next();
    assert_eq!(app.selected_index(), Some(0));
}

#[test]
fn selection_clamps_at_the_ends() {
    let mut app = app_with(
        vec![record(1, PlotState::Running, "x"), record(2, PlotState::Running, "y")],
        vec![],
    );
    app.select_prev();
    assert_eq!(app.selected_index(), Some(0));
    app.select_prev();
    assert_eq!(app.selected_index(), Some(0));
    app.select_next();
    app.select_next();
    app.select_next();
    assert_eq!(app.selected_index(), Some(1));
}

#[test]
fn selection_follows_a_plot_into_the_archive() {
    let mut app = app_with(
        vec![record(1, PlotState::Running, "x"), record(2, PlotState::Running, "y")],
        vec![],
    );
    app.select_next();
    app.select_next();
    assert_eq!(app.selected_index(), Some(1));

    // Next poll: plot 2 finished and now sits in the archive behind a
    // new active plot.
    app.apply(HostUpdate::Snapshot {
        host: "a:8484".into(),
        snapshot: Snapshot {
            actives: vec![record(1, PlotState::Running, "x"), record(3, PlotState::Running, "z")],
            archived: vec![record(2, PlotState::Finished, "y")],
            ..Snapshot::default()
        },
    });

    assert_eq!(app.selected_index(), Some(2));
    let (_, selected) = app.selected_plot().unwrap();
    assert_eq!(selected.plot_id, 2);
    assert_eq!(selected.state, PlotState::Finished);
}

#[test]
fn no_rows_means_no_selection() {
    let mut app = app_with(vec![], vec![]);
    app.select_next();
    assert_eq!(app.selected_index(), None);
    assert!(app.selected_plot().is_none());
}

#[test]
fn kill_request_needs_a_running_plot_with_an_id() {
    let mut app = app_with(
        vec![record(1, PlotState::Running, "abc"), record(2, PlotState::Running, "")],
        vec![record(3, PlotState::Finished, "def")],
    );

    app.select_next();
    assert_eq!(
        app.kill_request(),
        Some(KillRequest { host: "a:8484".into(), external_id: "abc".into() })
    );

    // No external id yet: the DELETE verb has nothing to address.
    app.select_next();
    assert!(app.kill_request().is_none());

    // Terminal plots cannot be killed.
    app.select_next();
    assert!(app.kill_request().is_none());
}
