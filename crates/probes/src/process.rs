// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process probe: enumerate assistant processes and sample utilization.
//!
//! CPU% is the short-window utilization since the previous refresh of the
//! same pid, which is why the probe keeps one `System` alive across polls
//! instead of rebuilding it. Handle counts are a separate, lazier call -
//! see [`crate::handles`].

use crate::error::ProbeError;
use crate::handles;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use sysinfo::{ProcessesToUpdate, System};
use wd_core::thresholds::PROCESS_NAME_PREFIX;
use wd_core::ProcessSample;

/// Capability to enumerate and sample the watched processes.
#[async_trait]
pub trait ProcessProbe: Send + Sync {
    /// Fresh samples for every process whose name starts with the watched
    /// prefix. Empty when none are running.
    async fn sample(&self) -> Result<Vec<ProcessSample>, ProbeError>;

    /// Best-effort open-handle counts per pid. A pid maps to `None` when
    /// the platform call failed or timed out.
    async fn handle_counts(&self, pids: &[u32]) -> HashMap<u32, Option<u32>>;
}

/// Production probe backed by `sysinfo`.
#[derive(Clone)]
pub struct SysinfoProcessProbe {
    system: Arc<Mutex<System>>,
    prefix: String,
}

impl SysinfoProcessProbe {
    pub fn new() -> Self {
        Self::with_prefix(PROCESS_NAME_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            system: Arc::new(Mutex::new(System::new())),
            prefix: prefix.into(),
        }
    }
}

impl Default for SysinfoProcessProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessProbe for SysinfoProcessProbe {
    async fn sample(&self) -> Result<Vec<ProcessSample>, ProbeError> {
        let mut system = self.system.lock();
        system.refresh_processes(ProcessesToUpdate::All, true);

        let mut samples = Vec::new();
        for (pid, process) in system.processes() {
            let name = process.name().to_string_lossy().into_owned();
            if !name.starts_with(&self.prefix) {
                continue;
            }
            samples.push(ProcessSample {
                pid: pid.as_u32(),
                name,
                cpu_percent: f64::from(process.cpu_usage()),
                memory_mb: process.memory() / (1024 * 1024),
                uptime_seconds: process.run_time(),
                handle_count: None,
            });
        }
        samples.sort_by_key(|s| s.pid);
        Ok(samples)
    }

    async fn handle_counts(&self, pids: &[u32]) -> HashMap<u32, Option<u32>> {
        let mut counts = HashMap::with_capacity(pids.len());
        for &pid in pids {
            counts.insert(pid, handles::handle_count(pid).await);
        }
        counts
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
