// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic recovery planning.
//!
//! The plan is a pure function of the snapshot: same state, same steps.
//! Each step names the tool to call (when one applies) so an assistant can
//! execute the plan mechanically.

use serde::{Deserialize, Serialize};
use wd_core::{RiskLevel, StateSnapshot};

/// Top-level plan status, mirroring the risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Healthy,
    ActionNeeded,
    Urgent,
}

/// One ordered recovery step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    pub order: u32,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    pub detail: String,
}

/// The full ordered plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryPlan {
    pub status: PlanStatus,
    pub steps: Vec<PlanStep>,
}

struct StepList {
    steps: Vec<PlanStep>,
}

impl StepList {
    fn new() -> Self {
        Self { steps: Vec::new() }
    }

    fn push(&mut self, action: &str, tool: Option<&str>, detail: String) {
        self.steps.push(PlanStep {
            order: self.steps.len() as u32 + 1,
            action: action.to_string(),
            tool: tool.map(str::to_string),
            detail,
        });
    }
}

/// Derive the recovery plan from a snapshot.
pub fn plan(snapshot: &StateSnapshot) -> RecoveryPlan {
    let risk = &snapshot.hang_risk;
    let mut list = StepList::new();

    let status = match risk.level {
        RiskLevel::Critical => {
            list.push(
                "capture diagnostics",
                Some("nudge"),
                "run safe remediation; it bundles evidence if none exists yet".to_string(),
            );
            list.push(
                "release concurrency",
                Some("budget_get"),
                "inspect held leases and release what you can".to_string(),
            );
            if risk.disk_low {
                list.push(
                    "free space",
                    Some("preflight_fix"),
                    "aggressive log cleanup: halved retention and size limits".to_string(),
                );
            }
            list.push(
                "verify status",
                Some("status"),
                "confirm whether the hang signals persist".to_string(),
            );
            list.push(
                "reduce workload",
                None,
                "pause new heavy work until the risk level drops".to_string(),
            );
            if snapshot
                .active_incident
                .as_ref()
                .is_some_and(|i| !i.bundle_captured)
            {
                list.push(
                    "force bundle",
                    Some("doctor"),
                    "capture an evidence bundle for the active incident".to_string(),
                );
            }
            PlanStatus::Urgent
        }
        RiskLevel::Warn => {
            list.push(
                "safe remediation",
                Some("nudge"),
                "idempotent cleanup and evidence capture".to_string(),
            );
            if risk.disk_low {
                list.push(
                    "free space",
                    Some("preflight_fix"),
                    "compress old logs and trim oversized files".to_string(),
                );
            }
            if risk.no_activity_seconds > 0 {
                list.push(
                    "check activity",
                    Some("status"),
                    format!("no activity for {}s; watch for recovery", risk.no_activity_seconds),
                );
            }
            if risk.cpu_hot || risk.memory_high {
                list.push(
                    "check resource pressure",
                    Some("budget_get"),
                    "confirm concurrency is within the reduced cap".to_string(),
                );
            }
            list.push(
                "monitor",
                Some("status"),
                "re-check until the level returns to ok".to_string(),
            );
            PlanStatus::ActionNeeded
        }
        RiskLevel::Ok => {
            if snapshot
                .budget
                .as_ref()
                .is_some_and(|b| b.current_cap < b.base_cap)
            {
                list.push(
                    "budget recovering",
                    Some("budget_get"),
                    "cap restores after sustained ok; check hysteresis remaining".to_string(),
                );
            } else if snapshot.active_incident.is_some() {
                list.push(
                    "incident resolving",
                    Some("status"),
                    "risk is ok; the incident closes on the next poll".to_string(),
                );
            } else {
                list.push("no action needed", None, "all signals healthy".to_string());
            }
            PlanStatus::Healthy
        }
    };

    RecoveryPlan {
        status,
        steps: list.steps,
    }
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
