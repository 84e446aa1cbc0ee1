// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rendering for CLI replies: compact text or raw JSON.

use clap::ValueEnum;
use serde::Serialize;
use wd_core::{format_elapsed, BudgetSummary, StateSnapshot};
use wd_engine::{PreflightReply, RecoveryPlan, StatusReply};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print any reply as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render the status reply as a short operator-readable block.
pub fn render_status(reply: &StatusReply) -> String {
    let snapshot = &reply.snapshot;
    let mut out = String::new();

    let source = if reply.fresh {
        "daemon snapshot"
    } else {
        "live reading (daemon not running or stale)"
    };
    out.push_str(&format!("source:   {}\n", source));
    out.push_str(&format!("risk:     {}\n", snapshot.hang_risk.level));
    if let Some(attention) = &snapshot.attention {
        out.push_str(&format!("attention: {}\n", attention.level));
        if !attention.reason.is_empty() {
            out.push_str(&format!("reason:   {}\n", attention.reason));
        }
    }
    out.push_str(&render_processes(snapshot));
    match snapshot.disk_free_gb {
        Some(gb) => out.push_str(&format!("disk:     {:.1} GB free\n", gb)),
        None => out.push_str("disk:     unknown\n"),
    }
    out.push_str(&format!(
        "logs:     {:.1} MB in tree\n",
        snapshot.log_tree_size_mb
    ));
    if snapshot.composite_quiet_seconds > 0 {
        out.push_str(&format!(
            "quiet:    {}\n",
            format_elapsed(snapshot.composite_quiet_seconds)
        ));
    }
    if let Some(incident) = &snapshot.active_incident {
        out.push_str(&format!(
            "incident: {} (peak {}, bundle {})\n",
            incident.id,
            incident.peak_level,
            if incident.bundle_captured { "captured" } else { "pending" }
        ));
    }
    if let Some(budget) = &snapshot.budget {
        out.push_str(&format!(
            "budget:   {} of {} slots in use\n",
            budget.slots_in_use, budget.current_cap
        ));
    }
    for action in &snapshot.recommended_actions {
        out.push_str(&format!("  -> {}\n", action));
    }
    out
}

fn render_processes(snapshot: &StateSnapshot) -> String {
    if snapshot.processes.is_empty() {
        return "procs:    none watched\n".to_string();
    }
    let mut out = String::new();
    for p in &snapshot.processes {
        let handles = p
            .handle_count
            .map(|h| format!(", {} handles", h))
            .unwrap_or_default();
        out.push_str(&format!(
            "proc:     {} (pid {}) cpu {:.0}%, {} MB, up {}{}\n",
            p.name,
            p.pid,
            p.cpu_percent,
            p.memory_mb,
            format_elapsed(p.uptime_seconds),
            handles
        ));
    }
    out
}

/// Render the budget summary.
pub fn render_budget(summary: &BudgetSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "cap:      {} of base {}\n",
        summary.current_cap, summary.base_cap
    ));
    out.push_str(&format!(
        "slots:    {} in use, {} available\n",
        summary.slots_in_use, summary.slots_available
    ));
    if let Some(level) = summary.cap_set_by_risk {
        out.push_str(&format!("reduced:  by {} risk\n", level));
    }
    if summary.hysteresis_remaining_seconds > 0 {
        out.push_str(&format!(
            "restore:  in {} of sustained ok\n",
            format_elapsed(summary.hysteresis_remaining_seconds)
        ));
    }
    for lease in &summary.active_leases {
        out.push_str(&format!(
            "lease:    {} ({} slots) - {}\n",
            lease.id, lease.slots, lease.reason
        ));
    }
    out
}

/// Render a preflight report.
pub fn render_preflight(reply: &PreflightReply) -> String {
    let mut out = String::new();
    let mode = match (reply.fixed, reply.aggressive) {
        (false, _) => "scan only",
        (true, false) => "fixed",
        (true, true) => "fixed (aggressive)",
    };
    out.push_str(&format!("tree:     {} ({})\n", reply.tree.display(), mode));
    out.push_str(&format!(
        "size:     {:.1} MB -> {:.1} MB across {} files\n",
        reply.size_before_mb, reply.size_after_mb, reply.file_count
    ));
    let verb = if reply.fixed { "" } else { " candidates" };
    out.push_str(&format!(
        "actions:  {} compressed{verb}, {} trimmed{verb}, {} deleted{verb}\n",
        reply.compressed, reply.trimmed, reply.deleted
    ));
    out
}

/// Render the recovery plan.
pub fn render_plan(plan: &RecoveryPlan) -> String {
    let mut out = format!("status: {:?}\n", plan.status);
    for step in &plan.steps {
        let tool = step
            .tool
            .as_deref()
            .map(|t| format!(" [{}]", t))
            .unwrap_or_default();
        out.push_str(&format!(
            "  {}. {}{} - {}\n",
            step.order, step.action, tool, step.detail
        ));
    }
    out
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
