// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process samples produced by the process probe.

use serde::{Deserialize, Serialize};

/// One watched process at one poll.
///
/// Produced fresh each tick; never retained across polls. `handle_count`
/// comes from a separate, lazier probe call and is `None` when that call
/// fails or the platform offers nothing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    /// Short-window CPU utilization since the previous sample of this pid.
    pub cpu_percent: f64,
    /// Resident set size in megabytes.
    pub memory_mb: u64,
    pub uptime_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_count: Option<u32>,
}
