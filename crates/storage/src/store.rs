// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed facade over the persisted records and logs.

use crate::journal::JsonlLog;
use crate::paths::DataDir;
use crate::record::{self, Loaded, RecordError};
use wd_core::{Budget, Incident, JournalEntry, StateSnapshot};

/// Handle to everything Warden persists.
///
/// Cheap to clone; both the polling supervisor and the tool handlers hold
/// one and coordinate only through the files it names.
#[derive(Debug, Clone)]
pub struct Store {
    dirs: DataDir,
}

impl Store {
    pub fn new(dirs: DataDir) -> Self {
        Self { dirs }
    }

    pub fn dirs(&self) -> &DataDir {
        &self.dirs
    }

    /// Load the snapshot; missing or corrupt yields the default.
    pub fn load_state(&self) -> Result<Loaded<StateSnapshot>, RecordError> {
        record::load_or_default(&self.dirs.state_path())
    }

    pub fn save_state(&self, state: &StateSnapshot) -> Result<(), RecordError> {
        record::save(&self.dirs.state_path(), state)
    }

    /// Load the budget; missing or corrupt yields the default (base cap,
    /// no leases - in-flight leases do not survive corruption).
    pub fn load_budget(&self) -> Result<Loaded<Budget>, RecordError> {
        record::load_or_default(&self.dirs.budget_path())
    }

    pub fn save_budget(&self, budget: &Budget) -> Result<(), RecordError> {
        record::save(&self.dirs.budget_path(), budget)
    }

    pub fn journal(&self) -> JsonlLog<JournalEntry> {
        JsonlLog::at(self.dirs.journal_path())
    }

    pub fn incidents(&self) -> JsonlLog<Incident> {
        JsonlLog::at(self.dirs.incidents_path())
    }

    /// Convenience: append one journal entry, logging on failure instead
    /// of propagating (journaling is never worth failing a tick over).
    pub fn journal_best_effort(&self, entry: &JournalEntry) {
        if let Err(e) = self.journal().append(entry) {
            tracing::warn!(error = %e, "failed to append journal entry");
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
