// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Attention synthesis: fuse risk, budget, disk, and incident state into
//! one operator-visible level with a stable `since`.

use wd_core::{Attention, AttentionLevel, BudgetSummary, HangRisk, Incident, RiskLevel};

/// Inputs for one synthesis pass.
#[derive(Debug, Clone, Copy)]
pub struct AttentionInputs<'a> {
    pub risk: &'a HangRisk,
    pub budget: Option<&'a BudgetSummary>,
    pub active_incident: Option<&'a Incident>,
    /// Previous tick's attention, for `since` stability.
    pub previous: Option<&'a Attention>,
}

/// Synthesize the attention record for this tick.
///
/// First matching condition decides the level; all matching conditions
/// contribute reasons and recommended actions. `since` is carried over
/// from the previous reading iff the level is unchanged.
pub fn synthesize(inputs: &AttentionInputs, now_ms: u64) -> Attention {
    let risk = inputs.risk;
    let cap_reduced = inputs
        .budget
        .is_some_and(|b| b.current_cap < b.base_cap);

    let level = if risk.level == RiskLevel::Critical {
        AttentionLevel::Critical
    } else if risk.level == RiskLevel::Warn {
        AttentionLevel::Warn
    } else if risk.disk_low {
        AttentionLevel::Warn
    } else if cap_reduced {
        AttentionLevel::Info
    } else if inputs.active_incident.is_some() {
        AttentionLevel::Info
    } else {
        AttentionLevel::None
    };

    let mut reasons: Vec<String> = risk.reasons.clone();
    if cap_reduced {
        if let Some(budget) = inputs.budget {
            reasons.push(format!(
                "concurrency cap reduced to {} (base {})",
                budget.current_cap, budget.base_cap
            ));
        }
    }
    if let Some(incident) = inputs.active_incident {
        reasons.push(format!("incident {} active", incident.id));
    }

    let mut actions = Vec::new();
    match level {
        AttentionLevel::Critical => {
            if inputs
                .active_incident
                .is_some_and(|i| !i.bundle_captured)
            {
                actions.push("run recovery tool (recovery_plan)".to_string());
            }
            actions.push("release concurrency you hold (budget_release)".to_string());
            if risk.disk_low {
                actions.push("free log space (preflight_fix aggressive)".to_string());
            }
            actions.push("reduce concurrent work until status clears".to_string());
        }
        AttentionLevel::Warn => {
            actions.push("run safe remediation (nudge)".to_string());
            if risk.disk_low {
                actions.push("free log space (preflight_fix)".to_string());
            }
            actions.push("watch status until it clears (status)".to_string());
        }
        AttentionLevel::Info => {
            if cap_reduced {
                actions.push("check budget before heavy work (budget_get)".to_string());
            }
            if inputs.active_incident.is_some() {
                actions.push("monitor incident resolution (status)".to_string());
            }
        }
        AttentionLevel::None => {}
    }

    let since_ms = match inputs.previous {
        Some(previous) if previous.level == level => previous.since_ms,
        _ => now_ms,
    };

    Attention {
        level,
        since_ms,
        reason: reasons.join("; "),
        recommended_actions: actions,
        incident_id: inputs.active_incident.map(|i| i.id.clone()),
    }
}

#[cfg(test)]
#[path = "attention_tests.rs"]
mod tests;
