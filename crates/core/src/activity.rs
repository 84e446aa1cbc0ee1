// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Activity signals derived from the log tree and process samples.

use serde::{Deserialize, Serialize};

/// Where an activity reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivitySource {
    LogMtime,
    Cpu,
}

/// Fused activity picture for one tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySignals {
    /// Seconds since the most recent mtime in the log tree; −1 when unknown.
    pub log_last_modified_seconds_ago: i64,
    /// True when any watched process is above the CPU low threshold.
    pub cpu_active: bool,
    pub sources: Vec<ActivitySource>,
}

impl Default for ActivitySignals {
    fn default() -> Self {
        Self {
            log_last_modified_seconds_ago: -1,
            cpu_active: false,
            sources: Vec::new(),
        }
    }
}

impl ActivitySignals {
    /// True when the log tree is quiet past the given threshold, or unknown.
    pub fn log_quiet(&self, hang_threshold_seconds: u64) -> bool {
        self.log_last_modified_seconds_ago < 0
            || self.log_last_modified_seconds_ago as u64 > hang_threshold_seconds
    }
}
