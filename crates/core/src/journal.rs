// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only journal entries recording remediation actions.

use serde::{Deserialize, Serialize};

/// One remediation action, one line in `journal.jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub timestamp_ms: u64,
    /// What was done: "compress", "trim", "delete-stale", "bundle", ...
    pub action: String,
    /// Path or id the action applied to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_before: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_after: Option<u64>,
}

impl JournalEntry {
    pub fn new(timestamp_ms: u64, action: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            action: action.into(),
            target: None,
            detail: detail.into(),
            size_before: None,
            size_after: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_sizes(mut self, before: u64, after: u64) -> Self {
        self.size_before = Some(before);
        self.size_after = Some(after);
        self
    }
}
