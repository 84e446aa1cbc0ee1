// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    seconds = { 5, "5s" },
    minutes = { 150, "2m" },
    hours_even = { 7200, "2h" },
    hours_with_minutes = { 5400, "1h30m" },
    days = { 259200, "3d" },
)]
fn formats_short_durations(secs: u64, expected: &str) {
    assert_eq!(format_elapsed(secs), expected);
}

#[test]
fn ms_wrapper_truncates() {
    assert_eq!(format_elapsed_ms(5_999), "5s");
}
