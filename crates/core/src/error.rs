// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured error reporting for the tool and CLI boundaries.
//!
//! Internal errors stay as per-crate `thiserror` enums; anything that
//! crosses the RPC boundary is converted to an [`ErrorReport`] carrying a
//! stable code, a message, and a one-line operator hint.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error categories surfaced at the tool boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    StateCorrupt,
    StateWriteFailed,
    BudgetCorrupt,
    BudgetWriteFailed,
    BundleFailed,
    ScanFailed,
    FixFailed,
    ProcessScanFailed,
    DiskCheckFailed,
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::StateCorrupt => "STATE_CORRUPT",
            ErrorCode::StateWriteFailed => "STATE_WRITE_FAILED",
            ErrorCode::BudgetCorrupt => "BUDGET_CORRUPT",
            ErrorCode::BudgetWriteFailed => "BUDGET_WRITE_FAILED",
            ErrorCode::BundleFailed => "BUNDLE_FAILED",
            ErrorCode::ScanFailed => "SCAN_FAILED",
            ErrorCode::FixFailed => "FIX_FAILED",
            ErrorCode::ProcessScanFailed => "PROCESS_SCAN_FAILED",
            ErrorCode::DiskCheckFailed => "DISK_CHECK_FAILED",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }

    /// One-line operator directive for this category.
    pub fn hint(&self) -> &'static str {
        match self {
            ErrorCode::StateCorrupt => {
                "state.json was backed up and reset; the next poll repopulates it"
            }
            ErrorCode::StateWriteFailed => {
                "check free space and permissions on the warden data directory"
            }
            ErrorCode::BudgetCorrupt => {
                "budget.json was backed up and reset; re-acquire any leases you held"
            }
            ErrorCode::BudgetWriteFailed => {
                "check free space and permissions on the warden data directory"
            }
            ErrorCode::BundleFailed => {
                "retry `wd doctor`; if it keeps failing, check disk space"
            }
            ErrorCode::ScanFailed => "verify the watched log directory exists and is readable",
            ErrorCode::FixFailed => {
                "re-run `wd preflight --fix`; partially applied fixes are safe to repeat"
            }
            ErrorCode::ProcessScanFailed => {
                "process enumeration failed; hang detection is degraded until it recovers"
            }
            ErrorCode::DiskCheckFailed => {
                "disk-free probing failed; disk-pressure detection is degraded"
            }
            ErrorCode::Unknown => "see the daemon log for details",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structured payload every failed tool call returns.
///
/// Never a stack trace: `code` routes, `message` says what happened,
/// `hint` says what to do, `cause` carries the underlying error text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
    pub hint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ErrorReport {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: code.hint().to_string(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl fmt::Display) -> Self {
        self.cause = Some(cause.to_string());
        self
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.code, self.message, self.hint)?;
        if let Some(cause) = &self.cause {
            write!(f, " [cause: {}]", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorReport {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
