// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_advances_shared_across_clones() {
    let clock = FakeClock::new();
    let other = clock.clone();

    let start = clock.epoch_ms();
    other.advance(Duration::from_secs(5));

    assert_eq!(clock.epoch_ms(), start + 5_000);
    assert_eq!(clock.epoch_secs(), start / 1000 + 5);
}

#[test]
fn system_clock_is_nonzero() {
    assert!(SystemClock.epoch_ms() > 0);
}
