// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot body encoding.

use thiserror::Error;

use crate::Snapshot;

/// Errors from snapshot encoding/decoding.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Serialize a snapshot into an HTTP response body.
pub fn encode(snapshot: &Snapshot) -> Result<Vec<u8>, ProtocolError> {
    serde_json::to_vec(snapshot).map_err(ProtocolError::Encode)
}

/// Deserialize a snapshot from an HTTP response body.
///
/// Unknown fields are skipped and missing fields default, so a peer one
/// release ahead or behind still decodes.
pub fn decode(bytes: &[u8]) -> Result<Snapshot, ProtocolError> {
    serde_json::from_slice(bytes).map_err(ProtocolError::Decode)
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
