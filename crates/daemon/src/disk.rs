// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Disk-usage probing.
//!
//! The scheduler's space precheck and the snapshot's directory tables
//! both go through [`DiskProbe`] so tests can dictate free space.

use std::path::Path;

/// Report bytes available to new files at a path.
pub trait DiskProbe: Send + Sync {
    /// A probe failure (missing mount, permission) reports zero, which
    /// the space precheck treats as "no room". Conservative by contract.
    fn available_bytes(&self, path: &Path) -> u64;
}

/// Probe backed by the platform's filesystem statistics.
#[derive(Debug, Clone, Default)]
pub struct SystemDiskProbe;

impl DiskProbe for SystemDiskProbe {
    fn available_bytes(&self, path: &Path) -> u64 {
        match fs2::available_space(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "disk probe failed");
                0
            }
        }
    }
}

/// Fixed-answer probe for tests.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, Default)]
pub struct FakeDiskProbe {
    spaces: std::collections::HashMap<std::path::PathBuf, u64>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeDiskProbe {
    pub fn with(mut self, path: &str, bytes: u64) -> Self {
        self.spaces.insert(path.into(), bytes);
        self
    }
}

#[cfg(any(test, feature = "test-support"))]
impl DiskProbe for FakeDiskProbe {
    fn available_bytes(&self, path: &Path) -> u64 {
        self.spaces.get(path).copied().unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "disk_tests.rs"]
mod tests;
