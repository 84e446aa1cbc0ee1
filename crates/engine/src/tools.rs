// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The eight self-monitoring tool handlers.
//!
//! Handlers read the persisted snapshot when it is fresh (under 10 s old)
//! and compute a degraded live snapshot otherwise. They share the on-disk
//! records with the polling daemon and nothing else. Every failure is
//! converted to a structured [`ErrorReport`] - a caller never sees a raw
//! error chain.

use crate::attention::{synthesize, AttentionInputs};
use crate::bundle::{write_bundle, BundleSummary};
use crate::detector::{assess, DetectorInput};
use crate::logman::LogManager;
use crate::planner::{plan, RecoveryPlan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use wd_core::thresholds::GRACE_WINDOW_SECONDS;
use wd_core::{
    BudgetSummary, Clock, ErrorCode, ErrorReport, IdGen, Knobs, RiskLevel, StateSnapshot,
};
use wd_probes::{compose_signals, ActivityProbe, DiskProbe, ProcessProbe};
use wd_storage::Store;

/// Everything the handlers need; cheap to clone.
#[derive(Clone)]
pub struct Tools<C: Clock, I: IdGen> {
    store: Store,
    tree: PathBuf,
    knobs: Knobs,
    clock: C,
    ids: I,
    processes: Arc<dyn ProcessProbe>,
    disk: Arc<dyn DiskProbe>,
    activity: Arc<dyn ActivityProbe>,
}

/// `status` reply: the snapshot plus whether it came from the daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReply {
    /// True when the persisted snapshot was fresh; false for a one-shot
    /// degraded live reading.
    pub fresh: bool,
    pub snapshot: StateSnapshot,
}

/// `preflight_fix` reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreflightReply {
    pub tree: PathBuf,
    pub size_before_mb: f64,
    pub size_after_mb: f64,
    pub file_count: usize,
    pub compressed: usize,
    pub trimmed: usize,
    pub deleted: usize,
    pub aggressive: bool,
    pub fixed: bool,
}

/// `doctor` reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorReply {
    pub bundle_path: PathBuf,
    pub entries: usize,
    pub total_bytes: u64,
}

/// `nudge` reply: what the safe remediation actually did.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NudgeReply {
    pub actions: Vec<String>,
}

/// `budget_acquire` reply. A denial is a successful reply, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquireReply {
    pub granted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denial: Option<String>,
    pub summary: BudgetSummary,
}

/// `budget_release` reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseReply {
    pub released: bool,
    pub summary: BudgetSummary,
}

impl<C: Clock, I: IdGen> Tools<C, I> {
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
        Self {
            store,
            tree,
            knobs,
            clock,
            ids,
            processes,
            disk,
            activity,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// `status`: persisted snapshot if fresh, degraded live one otherwise.
    pub async fn status(&self) -> Result<StatusReply, ErrorReport> {
        let now_ms = self.clock.epoch_ms();
        let loaded = self.store.load_state().map_err(|e| {
            ErrorReport::new(ErrorCode::StateCorrupt, "failed to read state.json").with_cause(e)
        })?;

        if !loaded.recovered_from_corruption
            && loaded.value.updated_at_ms > 0
            && loaded.value.is_fresh(now_ms)
        {
            return Ok(StatusReply {
                fresh: true,
                snapshot: loaded.value,
            });
        }

        let snapshot = self.live_snapshot(loaded.value, now_ms).await;
        Ok(StatusReply {
            fresh: false,
            snapshot,
        })
    }

    /// One-shot degraded snapshot: no carried counters, so the grace
    /// window reads as just-expired and composite quiet as zero.
    async fn live_snapshot(&self, stale: StateSnapshot, now_ms: u64) -> StateSnapshot {
        let processes = match self.processes.sample().await {
            Ok(samples) => samples,
            Err(e) => {
                tracing::warn!(error = %e, "process probe failed for live snapshot");
                Vec::new()
            }
        };
        let disk_free_gb = match self.disk.free_gb(&self.tree).await {
            Ok(gb) => Some(gb),
            Err(e) => {
                tracing::warn!(error = %e, "disk probe failed for live snapshot");
                None
            }
        };
        let mtime_ago = self.activity.latest_mtime_seconds_ago().await;
        let log_tree_size_mb = self.activity.tree_size_mb().await.unwrap_or(0.0);
        let activity = compose_signals(mtime_ago, &processes);

        let hang_risk = assess(&DetectorInput {
            processes: &processes,
            activity: &activity,
            disk_free_gb,
            hang_threshold_seconds: self.knobs.hang_no_activity_seconds,
            process_age_seconds: GRACE_WINDOW_SECONDS,
            composite_quiet_seconds: 0,
        });

        let budget = self
            .store
            .load_budget()
            .ok()
            .map(|loaded| loaded.value.summarize(now_ms));

        let attention = synthesize(
            &AttentionInputs {
                risk: &hang_risk,
                budget: budget.as_ref(),
                active_incident: stale.active_incident.as_ref(),
                previous: stale.attention.as_ref(),
            },
            now_ms,
        );

        StateSnapshot {
            updated_at_ms: now_ms,
            daemon_running: false,
            daemon_pid: None,
            recommended_actions: attention.recommended_actions.clone(),
            processes,
            activity,
            hang_risk,
            disk_free_gb,
            log_tree_size_mb,
            active_incident: stale.active_incident,
            process_age_seconds: 0,
            composite_quiet_seconds: 0,
            budget,
            attention: Some(attention),
        }
    }

    /// `preflight_fix`: scan the tree and (optionally) remediate.
    pub async fn preflight(&self, fix: bool, aggressive: bool) -> Result<PreflightReply, ErrorReport> {
        let manager = LogManager::new(self.tree.clone());
        let scan = manager.scan(std::time::SystemTime::now()).map_err(|e| {
            ErrorReport::new(ErrorCode::ScanFailed, "log tree scan failed").with_cause(e)
        })?;

        if !fix {
            return Ok(PreflightReply {
                tree: self.tree.clone(),
                size_before_mb: scan.total_size_mb,
                size_after_mb: scan.total_size_mb,
                file_count: scan.file_count,
                compressed: scan.compressible.len(),
                trimmed: scan.oversized.len(),
                deleted: scan.stale.len(),
                aggressive,
                fixed: false,
            });
        }

        let report = manager
            .fix(aggressive, &self.store, &self.clock)
            .map_err(|e| {
                ErrorReport::new(ErrorCode::FixFailed, "log tree fix failed").with_cause(e)
            })?;

        Ok(PreflightReply {
            tree: self.tree.clone(),
            size_before_mb: report.size_before_mb,
            size_after_mb: report.size_after_mb,
            file_count: scan.file_count,
            compressed: report.compressed,
            trimmed: report.trimmed,
            deleted: report.deleted,
            aggressive,
            fixed: true,
        })
    }

    /// `doctor`: unconditionally capture a bundle.
    pub async fn doctor(&self, output_path: Option<PathBuf>) -> Result<DoctorReply, ErrorReport> {
        let status = self.status().await?;
        let summary = self
            .capture_bundle(&status.snapshot, output_path)
            .map_err(|e| {
                ErrorReport::new(ErrorCode::BundleFailed, "bundle capture failed").with_cause(e)
            })?;
        Ok(DoctorReply {
            bundle_path: summary.path,
            entries: summary.entries,
            total_bytes: summary.total_bytes,
        })
    }

    fn capture_bundle(
        &self,
        snapshot: &StateSnapshot,
        output_path: Option<PathBuf>,
    ) -> Result<BundleSummary, crate::error::EngineError> {
        write_bundle(
            &self.store,
            &self.tree,
            snapshot,
            self.clock.epoch_ms(),
            output_path,
        )
    }

    /// `nudge`: deterministic safe remediation. Idempotent; never
    /// escalates anything on its own.
    pub async fn nudge(&self) -> Result<NudgeReply, ErrorReport> {
        let status = self.status().await?;
        let snapshot = status.snapshot;
        let mut actions = Vec::new();

        let manager = LogManager::new(self.tree.clone());
        let scan = manager.scan(std::time::SystemTime::now()).map_err(|e| {
            ErrorReport::new(ErrorCode::ScanFailed, "log tree scan failed").with_cause(e)
        })?;

        let disk_low = snapshot.hang_risk.disk_low;
        if scan.needs_fix(&self.knobs) || disk_low {
            let report = manager
                .fix(disk_low, &self.store, &self.clock)
                .map_err(|e| {
                    ErrorReport::new(ErrorCode::FixFailed, "log tree fix failed").with_cause(e)
                })?;
            actions.push(format!(
                "log cleanup: {} compressed, {} trimmed, {} deleted ({:.1} MB -> {:.1} MB)",
                report.compressed,
                report.trimmed,
                report.deleted,
                report.size_before_mb,
                report.size_after_mb
            ));
        }

        let needs_bundle = snapshot
            .active_incident
            .as_ref()
            .is_some_and(|i| i.peak_level >= RiskLevel::Warn && !i.bundle_captured);
        if needs_bundle {
            let summary = self.capture_bundle(&snapshot, None).map_err(|e| {
                ErrorReport::new(ErrorCode::BundleFailed, "bundle capture failed").with_cause(e)
            })?;
            actions.push(format!("captured bundle {}", summary.path.display()));
            self.persist_bundle_flag(&snapshot, summary.path);
        }

        Ok(NudgeReply { actions })
    }

    /// Mark the active incident bundled inside state.json so a repeated
    /// nudge sees the flag and the daemon absorbs the capture on its next
    /// tick (it re-reads the persisted incident before its own gate).
    /// `updated_at_ms` is left alone so freshness still reflects the
    /// daemon.
    fn persist_bundle_flag(&self, snapshot: &StateSnapshot, bundle_path: PathBuf) {
        let mut updated = snapshot.clone();
        if let Some(incident) = &mut updated.active_incident {
            incident.bundle_captured = true;
            incident.bundle_path = Some(bundle_path);
        }
        if let Err(e) = self.store.save_state(&updated) {
            tracing::warn!(error = %e, "failed to persist bundle flag");
        }
    }

    /// `budget_get`: expire leases and summarize.
    pub async fn budget_get(&self) -> Result<BudgetSummary, ErrorReport> {
        let now_ms = self.clock.epoch_ms();
        let mut budget = self.load_budget()?;
        if budget.expire_leases(now_ms) > 0 {
            self.save_budget(&budget)?;
        }
        Ok(budget.summarize(now_ms))
    }

    /// `budget_acquire`: mint a lease under the current cap.
    pub async fn budget_acquire(
        &self,
        slots: u32,
        ttl_seconds: u64,
        reason: String,
    ) -> Result<AcquireReply, ErrorReport> {
        let now_ms = self.clock.epoch_ms();
        let mut budget = self.load_budget()?;
        budget.expire_leases(now_ms);

        match budget.acquire(slots, ttl_seconds, reason, &self.ids, now_ms) {
            Ok(lease) => {
                self.save_budget(&budget)?;
                Ok(AcquireReply {
                    granted: true,
                    lease_id: Some(lease.id),
                    denial: None,
                    summary: budget.summarize(now_ms),
                })
            }
            Err(denied) => {
                // Expiry may still have changed the record
                self.save_budget(&budget)?;
                Ok(AcquireReply {
                    granted: false,
                    lease_id: None,
                    denial: Some(denied.to_string()),
                    summary: budget.summarize(now_ms),
                })
            }
        }
    }

    /// `budget_release`: drop a lease by id.
    pub async fn budget_release(&self, lease_id: &str) -> Result<ReleaseReply, ErrorReport> {
        let now_ms = self.clock.epoch_ms();
        let mut budget = self.load_budget()?;
        budget.expire_leases(now_ms);
        let released = budget.release(lease_id);
        self.save_budget(&budget)?;
        Ok(ReleaseReply {
            released,
            summary: budget.summarize(now_ms),
        })
    }

    /// `recovery_plan`: deterministic step list for the current state.
    pub async fn recovery_plan(&self) -> Result<RecoveryPlan, ErrorReport> {
        let status = self.status().await?;
        Ok(plan(&status.snapshot))
    }

    fn load_budget(&self) -> Result<wd_core::Budget, ErrorReport> {
        self.store
            .load_budget()
            .map(|loaded| loaded.value)
            .map_err(|e| {
                ErrorReport::new(ErrorCode::BudgetCorrupt, "failed to read budget.json")
                    .with_cause(e)
            })
    }

    fn save_budget(&self, budget: &wd_core::Budget) -> Result<(), ErrorReport> {
        self.store.save_budget(budget).map_err(|e| {
            ErrorReport::new(ErrorCode::BudgetWriteFailed, "failed to write budget.json")
                .with_cause(e)
        })
    }
}

#[cfg(test)]
#[path = "tools_tests.rs"]
mod tests;
