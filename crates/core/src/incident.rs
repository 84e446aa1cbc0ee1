// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incident records: one named window from first non-ok risk to first ok.

use crate::risk::RiskLevel;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One incident. At most one is active (no `closed_at_ms`) at any time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// 8-char opaque id.
    pub id: String,
    pub started_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at_ms: Option<u64>,
    /// Latest risk summary; updated on every non-ok observation.
    pub reason: String,
    /// Monotonic: once critical, never demoted.
    pub peak_level: RiskLevel,
    pub bundle_captured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_path: Option<PathBuf>,
}

impl Incident {
    pub fn open(id: String, level: RiskLevel, reason: String, now_ms: u64) -> Self {
        Self {
            id,
            started_at_ms: now_ms,
            closed_at_ms: None,
            reason,
            peak_level: level,
            bundle_captured: false,
            bundle_path: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed_at_ms.is_some()
    }

    /// Raise the peak level; never demotes.
    pub fn escalate(&mut self, level: RiskLevel) {
        self.peak_level = self.peak_level.max(level);
    }
}
