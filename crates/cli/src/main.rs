// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! plotherd: terminal dashboard for one or more plot supervisors.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod aggregate;
mod poll;
mod ui;

use anyhow::bail;
use clap::Parser;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "plotherd", version, about = "Plot supervisor dashboard")]
struct Args {
    /// Supervisors to poll, comma separated; entries without a port get
    /// the default 8484
    #[arg(long, default_value = "localhost")]
    hosts: String,

    /// Capture mouse events (skip on constrained terminals)
    #[arg(long)]
    mouse: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let hosts = poll::normalize_hosts(&args.hosts);
    if hosts.is_empty() {
        bail!("no hosts to poll");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let (kill_tx, kill_rx) = mpsc::unbounded_channel();
    runtime.spawn(poll::drive(hosts.clone(), update_tx, kill_rx));

    let result = ui::run(&hosts, update_rx, kill_tx, args.mouse);
    runtime.shutdown_background();
    result
}
