// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot protocol for supervisor → client state transfer.
//!
//! Wire format: a self-describing JSON payload carried as the HTTP
//! response body. Decoders tolerate added fields, so supervisor and
//! client can be upgraded independently.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod codec;
mod snapshot;

pub use codec::{decode, encode, ProtocolError};
pub use snapshot::Snapshot;
