// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incident lifecycle: open on first non-ok risk, escalate on critical,
//! close on the first ok, with an exactly-once bundle-capture gate.

use std::collections::HashMap;
use std::path::PathBuf;
use wd_core::thresholds::BUNDLE_COOLDOWN_SECONDS;
use wd_core::{HangRisk, IdGen, Incident, RiskLevel};

/// What one risk observation did to the incident state.
#[derive(Debug, Clone, PartialEq)]
pub enum IncidentUpdate {
    /// Nothing active and risk is ok.
    Quiet,
    /// A new incident was opened.
    Opened,
    /// The active incident's peak level rose to critical.
    Escalated,
    /// The active incident's reason was refreshed.
    Updated,
    /// The active incident closed; the caller appends it to the incident
    /// log.
    Closed(Incident),
}

/// Owns the optional active incident and the per-pid bundle cooldowns.
pub struct IncidentTracker<I: IdGen> {
    active: Option<Incident>,
    last_bundle_at_ms: HashMap<u32, u64>,
    ids: I,
}

impl<I: IdGen> IncidentTracker<I> {
    pub fn new(ids: I) -> Self {
        Self {
            active: None,
            last_bundle_at_ms: HashMap::new(),
            ids,
        }
    }

    /// Resume with an incident restored from the persisted snapshot, so a
    /// daemon restart does not double-open or double-bundle.
    pub fn resume(ids: I, active: Option<Incident>) -> Self {
        Self {
            active: active.filter(|i| !i.is_closed()),
            last_bundle_at_ms: HashMap::new(),
            ids,
        }
    }

    pub fn active(&self) -> Option<&Incident> {
        self.active.as_ref()
    }

    /// Feed one risk observation through the state machine.
    pub fn observe(&mut self, risk: &HangRisk, now_ms: u64) -> IncidentUpdate {
        match (&mut self.active, risk.level) {
            (None, RiskLevel::Ok) => IncidentUpdate::Quiet,
            (None, level) => {
                self.active = Some(Incident::open(
                    self.ids.next(),
                    level,
                    risk.summary(),
                    now_ms,
                ));
                IncidentUpdate::Opened
            }
            (Some(incident), RiskLevel::Ok) => {
                incident.closed_at_ms = Some(now_ms);
                let closed = incident.clone();
                self.active = None;
                IncidentUpdate::Closed(closed)
            }
            (Some(incident), level) => {
                incident.reason = risk.summary();
                if level > incident.peak_level {
                    incident.escalate(level);
                    IncidentUpdate::Escalated
                } else {
                    IncidentUpdate::Updated
                }
            }
        }
    }

    /// The bundle-capture gate: true iff an incident is active at critical
    /// peak, nothing has been captured for it yet, and every given pid is
    /// past its capture cooldown.
    pub fn should_capture_bundle(&self, pids: &[u32], now_ms: u64) -> bool {
        let Some(incident) = &self.active else {
            return false;
        };
        if incident.peak_level != RiskLevel::Critical || incident.bundle_captured {
            return false;
        }
        pids.iter().all(|pid| {
            self.last_bundle_at_ms
                .get(pid)
                .is_none_or(|&at| now_ms.saturating_sub(at) >= BUNDLE_COOLDOWN_SECONDS * 1000)
        })
    }

    /// Record a successful capture: flags the incident and stamps the
    /// cooldown for every pid that was bundled.
    pub fn mark_captured(&mut self, path: PathBuf, pids: &[u32], now_ms: u64) {
        if let Some(incident) = &mut self.active {
            incident.bundle_captured = true;
            incident.bundle_path = Some(path);
        }
        for &pid in pids {
            self.last_bundle_at_ms.insert(pid, now_ms);
        }
    }

    /// Merge a capture recorded by another process into this tracker.
    ///
    /// The tool surface also bundles (nudge, when an incident has no
    /// evidence yet) and records the capture in the persisted incident.
    /// Absorbing it here keeps the gate exactly-once and stamps the pid
    /// cooldowns the external writer could not reach.
    pub fn absorb_capture(&mut self, persisted: Option<&Incident>, pids: &[u32], now_ms: u64) {
        let Some(active) = &mut self.active else {
            return;
        };
        let Some(persisted) = persisted else {
            return;
        };
        if persisted.id != active.id || !persisted.bundle_captured || active.bundle_captured {
            return;
        }

        active.bundle_captured = true;
        active.bundle_path = persisted.bundle_path.clone();
        for &pid in pids {
            self.last_bundle_at_ms.insert(pid, now_ms);
        }
    }
}

#[cfg(test)]
#[path = "incident_tests.rs"]
mod tests;
