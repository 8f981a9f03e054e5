// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor polling.
//!
//! One task per host fetches the snapshot on a fixed cadence and posts
//! the outcome to the UI channel. Failures carry the error text; the
//! aggregator keeps the previous snapshot on display.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

use plotherd_wire::Snapshot;

pub const POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// What a poll produced for one host.
#[derive(Debug)]
pub enum HostUpdate {
    Snapshot { host: String, snapshot: Snapshot },
    Error { host: String, message: String },
}

/// Operator request to kill a plot on its owning supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillRequest {
    pub host: String,
    pub external_id: String,
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("supervisor answered {0}")]
    Status(reqwest::StatusCode),

    #[error(transparent)]
    Protocol(#[from] plotherd_wire::ProtocolError),
}

/// Split a `host1,host2` list and give portless entries the default
/// supervisor port.
pub fn normalize_hosts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(|h| {
            if h.contains(':') {
                h.to_string()
            } else {
                format!("{h}:8484")
            }
        })
        .collect()
}

/// HTTP face of one or more supervisors.
pub struct Poller {
    client: reqwest::Client,
}

impl Poller {
    pub fn new() -> Result<Self, PollError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, host: &str) -> Result<Snapshot, PollError> {
        let response = self.client.get(format!("http://{host}/")).send().await?;
        if !response.status().is_success() {
            return Err(PollError::Status(response.status()));
        }
        let body = response.bytes().await?;
        Ok(plotherd_wire::decode(&body)?)
    }

    pub async fn kill(&self, host: &str, external_id: &str) -> Result<(), PollError> {
        let response = self
            .client
            .delete(format!("http://{host}/{external_id}"))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PollError::Status(response.status()));
        }
        Ok(())
    }
}

/// Drive all network traffic: one poll loop per host, plus kill
/// requests from the UI. Runs until the UI channel closes.
pub async fn drive(
    hosts: Vec<String>,
    tx: mpsc::UnboundedSender<HostUpdate>,
    mut kill_rx: mpsc::UnboundedReceiver<KillRequest>,
) {
    let poller = match Poller::new() {
        Ok(p) => p,
        Err(e) => {
            for host in hosts {
                let _ = tx.send(HostUpdate::Error {
                    host,
                    message: format!("http client setup failed: {e}"),
                });
            }
            return;
        }
    };
    for host in hosts {
        tokio::spawn(poll_loop(host, tx.clone()));
    }
    while let Some(req) = kill_rx.recv().await {
        if let Err(e) = poller.kill(&req.host, &req.external_id).await {
            let _ = tx.send(HostUpdate::Error {
                host: req.host,
                message: format!("kill {} failed: {e}", req.external_id),
            });
        }
    }
}

async fn poll_loop(host: String, tx: mpsc::UnboundedSender<HostUpdate>) {
    let poller = match Poller::new() {
        Ok(p) => p,
        Err(e) => {
            let _ = tx.send(HostUpdate::Error {
                host,
                message: format!("http client setup failed: {e}"),
            });
            return;
        }
    };
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    loop {
        ticker.tick().await;
        let update = match poller.fetch(&host).await {
            Ok(snapshot) => HostUpdate::Snapshot { host: host.clone(), snapshot },
            Err(e) => HostUpdate::Error { host: host.clone(), message: e.to_string() },
        };
        if tx.send(update).is_err() {
            // UI is gone; stop polling.
            return;
        }
    }
}

#[cfg(test)]
#[path = "poll_tests.rs"]
mod tests;
