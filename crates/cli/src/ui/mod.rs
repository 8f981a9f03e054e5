// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal lifecycle and the input/redraw loop.
//!
//! Network tasks post [`HostUpdate`]s over a channel; the loop drains
//! it between frames so all state mutation happens on the UI thread.

mod app;
mod draw;

pub use app::App;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use plotherd_core::{Clock, SystemClock};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::poll::{HostUpdate, KillRequest};

const INPUT_POLL: Duration = Duration::from_millis(250);

/// Run the dashboard until the operator quits.
pub fn run(
    hosts: &[String],
    rx: mpsc::UnboundedReceiver<HostUpdate>,
    kill_tx: mpsc::UnboundedSender<KillRequest>,
    mouse: bool,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    if mouse {
        execute!(stdout, EnableMouseCapture).context("enable mouse capture")?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let result = event_loop(&mut terminal, App::new(hosts), rx, kill_tx);

    // Restore the terminal even when the loop failed.
    let _ = disable_raw_mode();
    if mouse {
        let _ = execute!(terminal.backend_mut(), DisableMouseCapture);
    }
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    mut rx: mpsc::UnboundedReceiver<HostUpdate>,
    kill_tx: mpsc::UnboundedSender<KillRequest>,
) -> Result<()> {
    let clock = SystemClock;
    loop {
        while let Ok(update) = rx.try_recv() {
            app.apply(update);
        }

        let now_ms = clock.epoch_ms();
        terminal.draw(|frame| draw::draw(frame, &app, now_ms))?;

        if !event::poll(INPUT_POLL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Char('K') => {
                if let Some(request) = app.kill_request() {
                    let _ = kill_tx.send(request);
                }
            }
            _ => {}
        }
    }
}
