// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake probes for tests: fully scripted readings, no OS access.

use crate::error::ProbeError;
use crate::{ActivityProbe, DiskProbe, ProcessProbe};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use wd_core::ProcessSample;

/// Scripted process probe. Clones share the same readings.
#[derive(Clone, Default)]
pub struct FakeProcessProbe {
    samples: Arc<Mutex<Vec<ProcessSample>>>,
    handle_counts: Arc<Mutex<HashMap<u32, Option<u32>>>>,
}

impl FakeProcessProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_samples(&self, samples: Vec<ProcessSample>) {
        *self.samples.lock() = samples;
    }

    pub fn set_handle_count(&self, pid: u32, count: Option<u32>) {
        self.handle_counts.lock().insert(pid, count);
    }
}

#[async_trait]
impl ProcessProbe for FakeProcessProbe {
    async fn sample(&self) -> Result<Vec<ProcessSample>, ProbeError> {
        Ok(self.samples.lock().clone())
    }

    async fn handle_counts(&self, pids: &[u32]) -> HashMap<u32, Option<u32>> {
        let scripted = self.handle_counts.lock();
        pids.iter()
            .map(|pid| (*pid, scripted.get(pid).copied().flatten()))
            .collect()
    }
}

/// Scripted disk probe. `None` free space simulates a probe failure.
#[derive(Clone, Default)]
pub struct FakeDiskProbe {
    free_gb: Arc<Mutex<Option<f64>>>,
}

impl FakeDiskProbe {
    pub fn with_free_gb(free_gb: f64) -> Self {
        let probe = Self::default();
        probe.set_free_gb(Some(free_gb));
        probe
    }

    pub fn set_free_gb(&self, free_gb: Option<f64>) {
        *self.free_gb.lock() = free_gb;
    }
}

#[async_trait]
impl DiskProbe for FakeDiskProbe {
    async fn free_gb(&self, _path: &Path) -> Result<f64, ProbeError> {
        let scripted = *self.free_gb.lock();
        scripted.ok_or_else(|| ProbeError::Failed("disk probe scripted to fail".to_string()))
    }
}

/// Scripted activity probe.
#[derive(Clone)]
pub struct FakeActivityProbe {
    mtime_seconds_ago: Arc<Mutex<i64>>,
    tree_size_mb: Arc<Mutex<f64>>,
}

impl Default for FakeActivityProbe {
    fn default() -> Self {
        Self {
            mtime_seconds_ago: Arc::new(Mutex::new(-1)),
            tree_size_mb: Arc::new(Mutex::new(0.0)),
        }
    }
}

impl FakeActivityProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mtime_seconds_ago(&self, seconds: i64) {
        *self.mtime_seconds_ago.lock() = seconds;
    }

    pub fn set_tree_size_mb(&self, mb: f64) {
        *self.tree_size_mb.lock() = mb;
    }
}

#[async_trait]
impl ActivityProbe for FakeActivityProbe {
    async fn latest_mtime_seconds_ago(&self) -> i64 {
        *self.mtime_seconds_ago.lock()
    }

    async fn tree_size_mb(&self) -> Result<f64, ProbeError> {
        Ok(*self.tree_size_mb.lock())
    }
}
