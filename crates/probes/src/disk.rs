// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Disk-free probe.

use crate::error::ProbeError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use sysinfo::Disks;

/// Capability to report free space for a target path.
#[async_trait]
pub trait DiskProbe: Send + Sync {
    /// Free gigabytes on the filesystem holding `path`.
    async fn free_gb(&self, path: &Path) -> Result<f64, ProbeError>;
}

/// Production probe backed by `sysinfo`'s disk list.
#[derive(Debug, Clone, Default)]
pub struct SysinfoDiskProbe;

#[async_trait]
impl DiskProbe for SysinfoDiskProbe {
    async fn free_gb(&self, path: &Path) -> Result<f64, ProbeError> {
        // Canonicalize so relative paths and symlinks land on the right
        // mount; fall back to the raw path for not-yet-existing targets.
        let target: PathBuf = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let disks = Disks::new_with_refreshed_list();
        let best = disks
            .list()
            .iter()
            .filter(|d| target.starts_with(d.mount_point()))
            .max_by_key(|d| d.mount_point().as_os_str().len());

        match best {
            Some(disk) => Ok(disk.available_space() as f64 / (1024.0 * 1024.0 * 1024.0)),
            None => Err(ProbeError::Failed(format!(
                "no mount point covers {}",
                target.display()
            ))),
        }
    }
}

#[cfg(test)]
#[path = "disk_tests.rs"]
mod tests;
