// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Frame rendering: four tables, the log viewport, and the per-host
//! status lines.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use plotherd_core::{format_duration, format_gb, format_timestamp};

use crate::aggregate::DirStats;
use crate::ui::app::App;

pub(super) fn draw(frame: &mut Frame, app: &App, now_ms: u64) {
    let statuses = app.view.statuses();
    let status_height = statuses.len().min(4) as u16 + 2;

    let areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Min(6),
            Constraint::Length(status_height),
        ])
        .split(frame.size());

    let selected = app.selected_index();
    let active_count = app.view.active_rows().len();
    draw_active(frame, areas[0], app, now_ms, selected);
    draw_dirs(frame, areas[1], app);
    draw_archived(frame, areas[2], app, selected, active_count);
    draw_log(frame, areas[3], app);
    draw_status(frame, areas[4], &statuses);
}

fn header(cells: &[&'static str]) -> Row<'static> {
    Row::new(cells.to_vec()).style(Style::default().fg(Color::Yellow))
}

fn selected_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

fn draw_active(frame: &mut Frame, area: Rect, app: &App, now_ms: u64, selected: Option<usize>) {
    let rows: Vec<Row> = app
        .view
        .active_rows()
        .iter()
        .map(|row| {
            Row::new(vec![
                row.host.clone(),
                format_timestamp(row.record.start_time_ms),
                format_duration(row.record.duration_ms(now_ms)),
                row.record.phase.clone(),
                row.record.progress.clone(),
                row.record.plot_dir.clone(),
                row.record.target_dir.clone(),
                row.record.external_id.clone(),
            ])
        })
        .collect();

    let count = rows.len();
    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(19),
            Constraint::Length(9),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Min(12),
            Constraint::Min(12),
            Constraint::Min(16),
        ],
    )
    .header(header(&["Host", "Start", "Duration", "Phase", "Prog", "Temp Dir", "Target Dir", "Id"]))
    .highlight_style(selected_style())
    .block(Block::default().borders(Borders::ALL).title("Active Plots"));

    let mut state = TableState::default();
    state.select(selected.filter(|i| *i < count));
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_dirs(frame: &mut Frame, area: Rect, app: &App) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let temp_rows: Vec<Row> = app
        .view
        .temp_dir_rows()
        .iter()
        .map(|row| {
            Row::new(vec![row.host.clone(), row.dir.clone(), format_gb(row.available)])
        })
        .collect();
    let temp_table = Table::new(
        temp_rows,
        [Constraint::Length(20), Constraint::Min(12), Constraint::Length(10)],
    )
    .header(header(&["Host", "Directory", "Free"]))
    .block(Block::default().borders(Borders::ALL).title("Temp Directories"));
    frame.render_widget(temp_table, halves[0]);

    let stats = app.view.target_stats();
    let target_rows: Vec<Row> = app
        .view
        .target_dir_rows()
        .iter()
        .map(|row| {
            let stat = stats.iter().find(|s| s.host == row.host && s.dir == row.dir);
            let (done, failed, phases) = match stat {
                Some(DirStats { finished, failed, avg_phase_ms, .. }) => (
                    finished.to_string(),
                    failed.to_string(),
                    avg_phase_ms
                        .iter()
                        .map(|ms| format_duration(*ms))
                        .collect::<Vec<_>>()
                        .join(" "),
                ),
                None => ("0".into(), "0".into(), String::new()),
            };
            Row::new(vec![
                row.host.clone(),
                row.dir.clone(),
                format_gb(row.available),
                done,
                failed,
                phases,
            ])
        })
        .collect();
    let target_table = Table::new(
        target_rows,
        [
            Constraint::Length(20),
            Constraint::Min(12),
            Constraint::Length(10),
            Constraint::Length(5),
            Constraint::Length(6),
            Constraint::Min(35),
        ],
    )
    .header(header(&["Host", "Directory", "Free", "Done", "Failed", "Avg Phases 1-4"]))
    .block(Block::default().borders(Borders::ALL).title("Target Directories"));
    frame.render_widget(target_table, halves[1]);
}

fn draw_archived(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    selected: Option<usize>,
    active_count: usize,
) {
    let rows: Vec<Row> = app
        .view
        .archived_rows()
        .iter()
        .map(|row| {
            Row::new(vec![
                row.host.clone(),
                format_timestamp(row.record.start_time_ms),
                format_duration(row.record.duration_ms(row.record.end_time_ms)),
                row.record.state.to_string(),
                row.record.target_dir.clone(),
                row.record.external_id.clone(),
            ])
        })
        .collect();

    let count = rows.len();
    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(19),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Min(12),
            Constraint::Min(16),
        ],
    )
    .header(header(&["Host", "Start", "Duration", "State", "Target Dir", "Id"]))
    .highlight_style(selected_style())
    .block(Block::default().borders(Borders::ALL).title("Last Plots"));

    let mut state = TableState::default();
    state.select(
        selected
            .and_then(|i| i.checked_sub(active_count))
            .filter(|i| *i < count),
    );
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_log(frame: &mut Frame, area: Rect, app: &App) {
    let (title, text) = match app.selected_plot() {
        Some((host, record)) => {
            let label = if record.external_id.is_empty() {
                record.plot_id.to_string()
            } else {
                record.external_id.clone()
            };
            (
                format!("Log [{label}] on {host} - {} {}", record.state, record.progress),
                record.tail.iter().cloned().collect::<Vec<_>>().join("\n"),
            )
        }
        None => ("Log".to_string(), String::new()),
    };
    let log = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(log, area);
}

fn draw_status(frame: &mut Frame, area: Rect, statuses: &[(String, String)]) {
    let text = statuses
        .iter()
        .map(|(host, line)| format!("{host}: {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, area);
}
