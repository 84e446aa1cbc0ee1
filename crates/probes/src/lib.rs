// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wd-probes: OS-facing probes for Warden.
//!
//! Each capability is a trait with a production implementation and a
//! scripted fake behind the `test-support` feature. Probes are
//! best-effort: they degrade to empty/`None` readings rather than failing
//! the caller's tick.

pub mod activity;
pub mod disk;
pub mod error;
pub mod handles;
pub mod process;
pub mod subprocess;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use activity::{compose_signals, recent_files, ActivityProbe, FsActivityProbe};
pub use disk::{DiskProbe, SysinfoDiskProbe};
pub use error::ProbeError;
pub use process::{ProcessProbe, SysinfoProcessProbe};
pub use subprocess::run_with_timeout;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeActivityProbe, FakeDiskProbe, FakeProcessProbe};
