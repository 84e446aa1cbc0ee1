// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn report_round_trips_through_json() {
    let report = ErrorReport::new(ErrorCode::BudgetCorrupt, "budget.json unreadable")
        .with_cause("expected value at line 1 column 2");

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"BUDGET_CORRUPT\""));

    let back: ErrorReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.code, ErrorCode::BudgetCorrupt);
    assert_eq!(back.hint, ErrorCode::BudgetCorrupt.hint());
    assert_eq!(back.cause.as_deref(), Some("expected value at line 1 column 2"));
}

#[test]
fn cause_is_omitted_when_absent() {
    let report = ErrorReport::new(ErrorCode::ScanFailed, "walk failed");
    let json = serde_json::to_string(&report).unwrap();
    assert!(!json.contains("cause"));
}

#[test]
fn display_includes_code_and_hint() {
    let report = ErrorReport::new(ErrorCode::BundleFailed, "zip write failed");
    let text = report.to_string();
    assert!(text.contains("BUNDLE_FAILED"));
    assert!(text.contains("wd doctor"));
}
