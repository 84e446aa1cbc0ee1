// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The polling supervisor: one tick every two seconds drives the whole
//! pipeline - probes, detector, incident tracker, budget, attention -
//! and rewrites the persisted snapshot atomically.
//!
//! Every step is individually fenced: a failing probe or collaborator
//! logs one line and degrades that tick's reading, it never breaks the
//! loop. Both shared records are re-read each tick: the budget because
//! tool handlers acquire and release leases concurrently, and the
//! persisted incident because nudge records bundle captures there.

use std::path::PathBuf;
use std::sync::Arc;
use wd_core::{Attention, Budget, Clock, IdGen, Knobs, StateSnapshot};
use wd_engine::{
    assess, synthesize, write_bundle, AttentionInputs, DetectorInput, IncidentTracker,
    IncidentUpdate, LogManager,
};
use wd_probes::{compose_signals, ActivityProbe, DiskProbe, ProcessProbe};
use wd_storage::Store;

/// Owns the carried counters and drives one tick at a time.
pub struct Supervisor<C: Clock, I: IdGen> {
    store: Store,
    tree: PathBuf,
    knobs: Knobs,
    clock: C,
    processes: Arc<dyn ProcessProbe>,
    disk: Arc<dyn DiskProbe>,
    activity: Arc<dyn ActivityProbe>,
    tracker: IncidentTracker<I>,
    /// First poll at which processes were observed; cleared when they
    /// disappear.
    process_first_seen_at_ms: Option<u64>,
    /// Start of the current interval where both hang signals hold.
    composite_quiet_since_ms: Option<u64>,
    previous_attention: Option<Attention>,
    daemon_pid: u32,
}

impl<C: Clock, I: IdGen> Supervisor<C, I> {
    /// Build a supervisor, resuming the active incident (if any) from the
    /// persisted snapshot so a daemon restart does not double-open it.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Store,
        tree: PathBuf,
        knobs: Knobs,
        clock: C,
        ids: I,
        processes: Arc<dyn ProcessProbe>,
        disk: Arc<dyn DiskProbe>,
        activity: Arc<dyn ActivityProbe>,
    ) -> Self {
        let resumed = store
            .load_state()
            .ok()
            .and_then(|loaded| loaded.value.active_incident);
        let previous_attention = store
            .load_state()
            .ok()
            .and_then(|loaded| loaded.value.attention);

        Self {
            store,
            tree,
            knobs,
            clock,
            processes,
            disk,
            activity,
            tracker: IncidentTracker::resume(ids, resumed),
            process_first_seen_at_ms: None,
            composite_quiet_since_ms: None,
            previous_attention,
            daemon_pid: std::process::id(),
        }
    }

    /// Run one tick of the pipeline. Never fails; failures degrade.
    pub async fn tick(&mut self) {
        let now_ms = self.clock.epoch_ms();

        // 1. Sample everything
        let disk_free_gb = match self.disk.free_gb(&self.tree).await {
            Ok(gb) => Some(gb),
            Err(e) => {
                tracing::warn!(error = %e, "disk probe failed");
                None
            }
        };
        let log_tree_size_mb = match self.activity.tree_size_mb().await {
            Ok(mb) => mb,
            Err(e) => {
                tracing::warn!(error = %e, "log tree size probe failed");
                0.0
            }
        };
        let processes = match self.processes.sample().await {
            Ok(samples) => samples,
            Err(e) => {
                tracing::warn!(error = %e, "process probe failed");
                Vec::new()
            }
        };
        let mtime_ago = self.activity.latest_mtime_seconds_ago().await;

        // 2. Track when processes first appeared
        if processes.is_empty() {
            self.process_first_seen_at_ms = None;
            self.composite_quiet_since_ms = None;
        } else if self.process_first_seen_at_ms.is_none() {
            self.process_first_seen_at_ms = Some(now_ms);
        }

        // 3. Process age
        let process_age_seconds = self
            .process_first_seen_at_ms
            .map(|first| now_ms.saturating_sub(first) / 1000)
            .unwrap_or(0);

        // 4. Composite quiet: advances only while BOTH signals hold
        let activity = compose_signals(mtime_ago, &processes);
        let log_quiet = activity.log_quiet(self.knobs.hang_no_activity_seconds);
        let cpu_low = !activity.cpu_active;
        if log_quiet && cpu_low {
            self.composite_quiet_since_ms.get_or_insert(now_ms);
        } else {
            self.composite_quiet_since_ms = None;
        }
        let composite_quiet_seconds = self
            .composite_quiet_since_ms
            .map(|since| now_ms.saturating_sub(since) / 1000)
            .unwrap_or(0);

        // 5. Assess risk
        let hang_risk = assess(&DetectorInput {
            processes: &processes,
            activity: &activity,
            disk_free_gb,
            hang_threshold_seconds: self.knobs.hang_no_activity_seconds,
            process_age_seconds,
            composite_quiet_seconds,
        });

        // 6. Incident transitions + evidence capture
        match self.tracker.observe(&hang_risk, now_ms) {
            IncidentUpdate::Opened => {
                tracing::info!(reason = %hang_risk.summary(), "incident opened");
            }
            IncidentUpdate::Escalated => {
                tracing::warn!(reason = %hang_risk.summary(), "incident escalated to critical");
            }
            IncidentUpdate::Closed(closed) => {
                tracing::info!(id = %closed.id, "incident closed");
                if let Err(e) = self.store.incidents().append(&closed) {
                    tracing::warn!(error = %e, "failed to append incident log");
                }
            }
            IncidentUpdate::Updated | IncidentUpdate::Quiet => {}
        }

        let pids: Vec<u32> = processes.iter().map(|p| p.pid).collect();

        // Re-read the persisted incident before gating, like the budget
        // re-read below: nudge records its own captures there, and the
        // gate must see them or it would bundle the same incident twice.
        match self.store.load_state() {
            Ok(loaded) => {
                self.tracker
                    .absorb_capture(loaded.value.active_incident.as_ref(), &pids, now_ms);
            }
            Err(e) => tracing::warn!(error = %e, "failed to re-read state.json"),
        }

        if self.tracker.should_capture_bundle(&pids, now_ms) {
            // Bundle from an interim snapshot; attention still reflects
            // the previous tick at this point in the pipeline.
            let interim = self.build_snapshot(
                now_ms,
                processes.clone(),
                activity.clone(),
                hang_risk.clone(),
                disk_free_gb,
                log_tree_size_mb,
                process_age_seconds,
                composite_quiet_seconds,
                None,
                self.previous_attention.clone(),
            );
            match write_bundle(&self.store, &self.tree, &interim, now_ms, None) {
                Ok(summary) => {
                    tracing::info!(path = %summary.path.display(), "bundle captured");
                    self.tracker.mark_captured(summary.path, &pids, now_ms);
                }
                Err(e) => tracing::warn!(error = %e, "bundle capture failed"),
            }
        }

        // 7. Automatic remediation under disk pressure
        if hang_risk.disk_low && self.knobs.auto_fix {
            let manager = LogManager::new(self.tree.clone());
            match manager.fix(true, &self.store, &self.clock) {
                Ok(report) => tracing::info!(
                    compressed = report.compressed,
                    trimmed = report.trimmed,
                    deleted = report.deleted,
                    "auto-fix pass complete"
                ),
                Err(e) => tracing::warn!(error = %e, "auto-fix pass failed"),
            }
        }

        // 8. Budget: re-read, expire, adjust, write back
        let budget_summary = match self.store.load_budget() {
            Ok(loaded) => {
                let mut budget: Budget = loaded.value;
                let expired = budget.expire_leases(now_ms);
                if expired > 0 {
                    tracing::debug!(expired, "expired leases");
                }
                if budget.adjust_cap(hang_risk.level, now_ms) {
                    tracing::info!(cap = budget.current_cap, risk = %hang_risk.level, "cap adjusted");
                }
                if let Err(e) = self.store.save_budget(&budget) {
                    tracing::warn!(error = %e, "failed to write budget.json");
                }
                Some(budget.summarize(now_ms))
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read budget.json");
                None
            }
        };

        // 9. Attach handle counts (best-effort, may be None per pid)
        let mut processes = processes;
        let counts = self.processes.handle_counts(&pids).await;
        for sample in &mut processes {
            sample.handle_count = counts.get(&sample.pid).copied().flatten();
        }

        // 10. Attention, threading the previous reading for `since`
        let attention = synthesize(
            &AttentionInputs {
                risk: &hang_risk,
                budget: budget_summary.as_ref(),
                active_incident: self.tracker.active(),
                previous: self.previous_attention.as_ref(),
            },
            now_ms,
        );
        self.previous_attention = Some(attention.clone());

        // 11. Persist the tick
        let snapshot = self.build_snapshot(
            now_ms,
            processes,
            activity,
            hang_risk,
            disk_free_gb,
            log_tree_size_mb,
            process_age_seconds,
            composite_quiet_seconds,
            budget_summary,
            Some(attention),
        );
        if let Err(e) = self.store.save_state(&snapshot) {
            tracing::error!(error = %e, "failed to write state.json");
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build_snapshot(
        &self,
        now_ms: u64,
        processes: Vec<wd_core::ProcessSample>,
        activity: wd_core::ActivitySignals,
        hang_risk: wd_core::HangRisk,
        disk_free_gb: Option<f64>,
        log_tree_size_mb: f64,
        process_age_seconds: u64,
        composite_quiet_seconds: u64,
        budget: Option<wd_core::BudgetSummary>,
        attention: Option<Attention>,
    ) -> StateSnapshot {
        StateSnapshot {
            updated_at_ms: now_ms,
            daemon_running: true,
            daemon_pid: Some(self.daemon_pid),
            recommended_actions: attention
                .as_ref()
                .map(|a| a.recommended_actions.clone())
                .unwrap_or_default(),
            processes,
            activity,
            hang_risk,
            disk_free_gb,
            log_tree_size_mb,
            active_incident: self.tracker.active().cloned(),
            process_age_seconds,
            composite_quiet_seconds,
            budget,
            attention,
        }
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
