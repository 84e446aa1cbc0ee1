// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The operator-visible attention synthesis record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Four-level urgency fused from risk, budget, disk, and incident state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum AttentionLevel {
    #[default]
    None,
    Info,
    Warn,
    Critical,
}

impl fmt::Display for AttentionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttentionLevel::None => write!(f, "none"),
            AttentionLevel::Info => write!(f, "info"),
            AttentionLevel::Warn => write!(f, "warn"),
            AttentionLevel::Critical => write!(f, "critical"),
        }
    }
}

/// One synthesized attention reading.
///
/// `since_ms` is carried over from the previous reading whenever the level
/// is unchanged, which makes dwell time at a level observable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attention {
    pub level: AttentionLevel,
    pub since_ms: u64,
    pub reason: String,
    pub recommended_actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<String>,
}

impl Attention {
    pub fn none(now_ms: u64) -> Self {
        Self {
            level: AttentionLevel::None,
            since_ms: now_ms,
            reason: String::new(),
            recommended_actions: Vec::new(),
            incident_id: None,
        }
    }
}
