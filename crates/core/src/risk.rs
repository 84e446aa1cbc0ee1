// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hang-risk levels and the composite risk record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of the current hang assessment.
///
/// Ordered so that `max` picks the worse of two levels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Ok,
    Warn,
    Critical,
}

impl RiskLevel {
    pub fn is_ok(&self) -> bool {
        matches!(self, RiskLevel::Ok)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Ok => write!(f, "ok"),
            RiskLevel::Warn => write!(f, "warn"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

/// Output of the hang-risk detector for one tick.
///
/// `reasons` holds one line per true condition, in rule order, so the
/// operator can read why the level is what it is.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HangRisk {
    pub level: RiskLevel,
    /// Seconds both hang signals have held (the composite quiet counter).
    pub no_activity_seconds: u64,
    /// Seconds every watched process has stayed below the CPU low threshold.
    pub cpu_low_seconds: u64,
    pub cpu_hot: bool,
    pub memory_high: bool,
    pub disk_low: bool,
    pub grace_remaining_seconds: u64,
    pub reasons: Vec<String>,
}

impl HangRisk {
    /// A one-line summary suitable as an incident reason.
    pub fn summary(&self) -> String {
        if self.reasons.is_empty() {
            "healthy".to_string()
        } else {
            self.reasons.join("; ")
        }
    }
}
