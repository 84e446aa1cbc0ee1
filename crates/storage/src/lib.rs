// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wd-storage: persisted records and append-only logs for Warden.

pub mod journal;
pub mod paths;
pub mod record;
pub mod store;

pub use journal::{JournalError, JsonlLog};
pub use paths::{default_watched_tree, DataDir, PathsError};
pub use record::{Loaded, RecordError};
pub use store::Store;
