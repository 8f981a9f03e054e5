// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admin HTTP endpoint.
//!
//! Two verbs on a trusted interface: `GET /` returns the encoded
//! supervisor snapshot, `DELETE /<plot_id>` best-effort kills the
//! matching active plot. Everything else is 404.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::Router;
use plotherd_core::Clock;
use tracing::{error, info};

use crate::supervisor::Supervisor;

/// Default admin port.
pub const DEFAULT_PORT: u16 = 8484;

pub fn router<C: Clock + 'static>(supervisor: Supervisor<C>) -> Router {
    Router::new()
        .route("/", get(get_snapshot::<C>))
        .route("/{plot_id}", delete(delete_plot::<C>))
        .with_state(supervisor)
}

/// Encode the supervisor snapshot. Encoding failure is the server's
/// problem, not the client's: 500 and carry on.
async fn get_snapshot<C: Clock + 'static>(State(supervisor): State<Supervisor<C>>) -> Response {
    let snapshot = supervisor.snapshot();
    match plotherd_wire::encode(&snapshot) {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode snapshot");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Kill by external plot id. Always 200; a miss (unknown id, already
/// terminal) is not the client's problem either.
async fn delete_plot<C: Clock + 'static>(
    State(supervisor): State<Supervisor<C>>,
    Path(plot_id): Path<String>,
) -> StatusCode {
    let killed = supervisor.kill(&plot_id);
    info!(%plot_id, killed, "kill requested");
    StatusCode::OK
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
