// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The persisted state snapshot rewritten by every supervisor tick.

use crate::activity::ActivitySignals;
use crate::attention::Attention;
use crate::budget::BudgetSummary;
use crate::incident::Incident;
use crate::process::ProcessSample;
use crate::risk::HangRisk;
use crate::thresholds::STATE_STALENESS_SECONDS;
use serde::{Deserialize, Serialize};

/// Everything a tool handler needs to answer questions about the watched
/// assistant, captured consistently within one tick.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub updated_at_ms: u64,
    pub daemon_running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daemon_pid: Option<u32>,
    pub processes: Vec<ProcessSample>,
    pub activity: ActivitySignals,
    pub hang_risk: HangRisk,
    pub recommended_actions: Vec<String>,
    /// None when the disk probe failed this tick.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_free_gb: Option<f64>,
    pub log_tree_size_mb: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_incident: Option<Incident>,
    /// Seconds since processes were first observed (0 when none).
    pub process_age_seconds: u64,
    /// Seconds both hang signals have held simultaneously.
    pub composite_quiet_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attention: Option<Attention>,
}

impl StateSnapshot {
    /// A snapshot is fresh for 10 seconds; after that, readers compute a
    /// degraded live snapshot instead of trusting it.
    pub fn is_fresh(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.updated_at_ms) < STATE_STALENESS_SECONDS * 1000
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
