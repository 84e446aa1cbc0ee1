// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Activity probe: recency and size of the watched log tree.
//!
//! The walk is shallow and explicitly bounded: files are ranked by mtime
//! and only the newest [`ACTIVITY_SCAN_LIMIT`] are considered, which keeps
//! the probe deterministic regardless of directory iteration order.

use crate::error::ProbeError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;
use wd_core::thresholds::{ACTIVITY_SCAN_LIMIT, CPU_LOW_THRESHOLD_PERCENT};
use wd_core::{ActivitySignals, ActivitySource, ProcessSample};

/// Depth bound for log-tree walks: project dirs plus one level of session
/// artifacts.
const WALK_DEPTH: usize = 3;

/// Capability to read recency and size off the watched log tree.
#[async_trait]
pub trait ActivityProbe: Send + Sync {
    /// Seconds since the most recent mtime in the tree; −1 when the tree
    /// is missing, empty, or unreadable.
    async fn latest_mtime_seconds_ago(&self) -> i64;

    /// Total size of the tree in megabytes (0.0 when missing).
    async fn tree_size_mb(&self) -> Result<f64, ProbeError>;
}

/// Production probe walking the filesystem.
#[derive(Debug, Clone)]
pub struct FsActivityProbe {
    tree: PathBuf,
}

impl FsActivityProbe {
    pub fn new(tree: PathBuf) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &Path {
        &self.tree
    }
}

#[async_trait]
impl ActivityProbe for FsActivityProbe {
    async fn latest_mtime_seconds_ago(&self) -> i64 {
        let newest = recent_files(&self.tree, 1);
        let Some((_, mtime)) = newest.first() else {
            return -1;
        };
        match mtime.elapsed() {
            Ok(elapsed) => elapsed.as_secs() as i64,
            // Future mtime (clock skew): treat as active right now
            Err(_) => 0,
        }
    }

    async fn tree_size_mb(&self) -> Result<f64, ProbeError> {
        if !self.tree.exists() {
            return Ok(0.0);
        }
        let mut total: u64 = 0;
        for entry in WalkDir::new(&self.tree).max_depth(WALK_DEPTH) {
            let entry = entry.map_err(|e| ProbeError::Failed(e.to_string()))?;
            if entry.file_type().is_file() {
                if let Ok(meta) = entry.metadata() {
                    total += meta.len();
                }
            }
        }
        Ok(total as f64 / (1024.0 * 1024.0))
    }
}

/// The newest `limit` files in the tree by mtime, newest first.
///
/// Ranking is explicit (sort by mtime, truncate) so the result does not
/// depend on directory iteration order. Unreadable entries are skipped.
pub fn recent_files(tree: &Path, limit: usize) -> Vec<(PathBuf, SystemTime)> {
    let capped = limit.min(ACTIVITY_SCAN_LIMIT);
    let mut files: Vec<(PathBuf, SystemTime)> = WalkDir::new(tree)
        .max_depth(WALK_DEPTH)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let mtime = e.metadata().ok()?.modified().ok()?;
            Some((e.into_path(), mtime))
        })
        .collect();

    files.sort_by(|a, b| b.1.cmp(&a.1));
    files.truncate(capped);
    files
}

/// Fuse the log-tree reading with process CPU into one activity record.
pub fn compose_signals(mtime_seconds_ago: i64, processes: &[ProcessSample]) -> ActivitySignals {
    let cpu_active = processes
        .iter()
        .any(|p| p.cpu_percent > CPU_LOW_THRESHOLD_PERCENT);

    let mut sources = Vec::new();
    if mtime_seconds_ago >= 0 {
        sources.push(ActivitySource::LogMtime);
    }
    if !processes.is_empty() {
        sources.push(ActivitySource::Cpu);
    }

    ActivitySignals {
        log_last_modified_seconds_ago: mtime_seconds_ago,
        cpu_active,
        sources,
    }
}

#[cfg(test)]
#[path = "activity_tests.rs"]
mod tests;
