// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! plotherdd: the plot supervisor daemon.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use plotherd_core::SystemClock;
use plotherd_daemon::disk::SystemDiskProbe;
use plotherd_daemon::server;
use plotherd_daemon::supervisor::Supervisor;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plotherdd", version, about = "Plot creation supervisor daemon")]
struct Args {
    /// Path to the JSON policy configuration (hot-reloaded on change)
    #[arg(long)]
    config: PathBuf,

    /// Local address to bind the admin endpoint to (default: any)
    #[arg(long, default_value = "0.0.0.0")]
    address: String,

    /// Admin endpoint port
    #[arg(long, default_value_t = server::DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let supervisor =
        Supervisor::new(args.config, Box::new(SystemDiskProbe), SystemClock);

    let listener = tokio::net::TcpListener::bind((args.address.as_str(), args.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", args.address, args.port))?;
    info!(address = %args.address, port = args.port, "admin endpoint listening");

    tokio::spawn(supervisor.clone().run());

    axum::serve(listener, server::router(supervisor))
        .await
        .context("admin endpoint failed")?;
    Ok(())
}
