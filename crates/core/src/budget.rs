// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrency budget: a cap-reducing leasing system.
//!
//! Risk reduces the cap (warn → 2, critical → 1); recovery back to the
//! base cap requires 60 seconds of sustained ok (hysteresis). Leases are
//! cooperative, time-bounded grants under the cap - the budget never
//! blocks or kills work.

use crate::id::IdGen;
use crate::risk::RiskLevel;
use crate::thresholds::{BASE_CAP, CRITICAL_CAP, HYSTERESIS_SECONDS, WARN_CAP};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A time-bounded grant of concurrency slots. Immutable once granted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lease {
    /// 8-char opaque id.
    pub id: String,
    pub slots: u32,
    pub reason: String,
    pub granted_at_ms: u64,
    pub expires_at_ms: u64,
}

/// Why an acquire was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquireError {
    #[error("slots must be at least 1")]
    InvalidSlots,
    #[error("ttlSeconds must be at least 1")]
    InvalidTtl,
    #[error("requested {requested} slots but only {available} available (cap {cap})")]
    InsufficientSlots {
        requested: u32,
        available: u32,
        cap: u32,
    },
}

/// The persisted budget record and its state machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub current_cap: u32,
    pub base_cap: u32,
    #[serde(default)]
    pub leases: Vec<Lease>,
    /// Set while the cap is reduced by risk; cleared on restoration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_set_by_risk: Option<RiskLevel>,
    pub cap_changed_at_ms: u64,
    /// Start of the current sustained-ok run; only set while the cap is
    /// below base.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok_since_at_ms: Option<u64>,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            current_cap: BASE_CAP,
            base_cap: BASE_CAP,
            leases: Vec::new(),
            cap_set_by_risk: None,
            cap_changed_at_ms: 0,
            ok_since_at_ms: None,
        }
    }
}

/// Read-only summary of the budget for the snapshot and tool surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub current_cap: u32,
    pub base_cap: u32,
    pub slots_in_use: u32,
    pub slots_available: u32,
    pub active_leases: Vec<Lease>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_set_by_risk: Option<RiskLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok_since_at_ms: Option<u64>,
    pub hysteresis_remaining_seconds: u64,
}

impl Budget {
    /// Sum of slots held by active leases.
    pub fn slots_in_use(&self) -> u32 {
        self.leases.iter().map(|l| l.slots).sum()
    }

    /// Slots still grantable under the current cap.
    ///
    /// Saturating: while a cap reduction has pushed in-use above the cap,
    /// this is zero and every acquire is refused until leases drain.
    pub fn slots_available(&self) -> u32 {
        self.current_cap.saturating_sub(self.slots_in_use())
    }

    /// Apply one risk observation to the cap.
    ///
    /// Any non-ok observation clears the sustained-ok clock, so a flap
    /// restarts the full hysteresis window. Returns true iff the cap
    /// changed (for logging).
    pub fn adjust_cap(&mut self, risk: RiskLevel, now_ms: u64) -> bool {
        match risk {
            RiskLevel::Critical => self.reduce_cap(CRITICAL_CAP, RiskLevel::Critical, now_ms),
            RiskLevel::Warn => self.reduce_cap(WARN_CAP, RiskLevel::Warn, now_ms),
            RiskLevel::Ok => {
                if self.current_cap >= self.base_cap {
                    self.ok_since_at_ms = None;
                    return false;
                }
                match self.ok_since_at_ms {
                    None => {
                        self.ok_since_at_ms = Some(now_ms);
                        false
                    }
                    Some(since) => {
                        if now_ms.saturating_sub(since) >= HYSTERESIS_SECONDS * 1000 {
                            self.current_cap = self.base_cap;
                            self.cap_set_by_risk = None;
                            self.ok_since_at_ms = None;
                            self.cap_changed_at_ms = now_ms;
                            true
                        } else {
                            false
                        }
                    }
                }
            }
        }
    }

    fn reduce_cap(&mut self, cap: u32, level: RiskLevel, now_ms: u64) -> bool {
        self.ok_since_at_ms = None;
        self.cap_set_by_risk = Some(level);
        if self.current_cap == cap {
            return false;
        }
        self.current_cap = cap;
        self.cap_changed_at_ms = now_ms;
        true
    }

    /// Mint a lease under the current cap.
    ///
    /// Callers must run [`Budget::expire_leases`] first so availability
    /// reflects live leases only.
    pub fn acquire(
        &mut self,
        slots: u32,
        ttl_seconds: u64,
        reason: impl Into<String>,
        ids: &impl IdGen,
        now_ms: u64,
    ) -> Result<Lease, AcquireError> {
        if slots == 0 {
            return Err(AcquireError::InvalidSlots);
        }
        if ttl_seconds == 0 {
            return Err(AcquireError::InvalidTtl);
        }
        let available = self.slots_available();
        if slots > available {
            return Err(AcquireError::InsufficientSlots {
                requested: slots,
                available,
                cap: self.current_cap,
            });
        }

        let lease = Lease {
            id: ids.next(),
            slots,
            reason: reason.into(),
            granted_at_ms: now_ms,
            expires_at_ms: now_ms + ttl_seconds * 1000,
        };
        self.leases.push(lease.clone());
        Ok(lease)
    }

    /// Remove a lease by id; returns whether it was found.
    pub fn release(&mut self, id: &str) -> bool {
        let before = self.leases.len();
        self.leases.retain(|l| l.id != id);
        self.leases.len() < before
    }

    /// Drop all leases at or past their expiry; returns how many.
    pub fn expire_leases(&mut self, now_ms: u64) -> usize {
        let before = self.leases.len();
        self.leases.retain(|l| l.expires_at_ms > now_ms);
        before - self.leases.len()
    }

    pub fn summarize(&self, now_ms: u64) -> BudgetSummary {
        let slots_in_use = self.slots_in_use();
        let hysteresis_remaining_seconds = match self.ok_since_at_ms {
            Some(since) if self.current_cap < self.base_cap => {
                let elapsed = now_ms.saturating_sub(since) / 1000;
                HYSTERESIS_SECONDS.saturating_sub(elapsed)
            }
            _ => 0,
        };
        BudgetSummary {
            current_cap: self.current_cap,
            base_cap: self.base_cap,
            slots_in_use,
            slots_available: self.slots_available(),
            active_leases: self.leases.clone(),
            cap_set_by_risk: self.cap_set_by_risk,
            ok_since_at_ms: self.ok_since_at_ms,
            hysteresis_remaining_seconds,
        }
    }
}

#[cfg(test)]
#[path = "budget_tests.rs"]
mod tests;
