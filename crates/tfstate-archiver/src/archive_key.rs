// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Deterministic object keys for archived state.
//!
//! Layout:
//!
//! ```text
//! {organization}/{workspace}/{YYYY}/{MM}/{DD}/{workspace}-{serial}-{state_id}-{run_id}.json
//! ```
//!
//! The date is the state version's creation date normalized to UTC, so a
//! timestamp carrying a local offset near midnight files under its UTC day
//! rather than the day in that offset. The same
//! (workspace, state version, run) always maps to the same key, so a
//! redelivered webhook overwrites the earlier object instead of duplicating it.

use std::fmt;

use chrono::{DateTime, Utc};

/// Object key under which one state snapshot is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveKey(String);

impl ArchiveKey {
    /// Build the key for a state version produced by a run.
    pub fn new(
        organization: &str,
        workspace: &str,
        created_at: DateTime<Utc>,
        serial: i64,
        state_id: &str,
        run_id: &str,
    ) -> Self {
        Self(format!(
            "{}/{}/{}/{}-{}-{}-{}.json",
            organization,
            workspace,
            created_at.format("%Y/%m/%d"),
            workspace,
            serial,
            state_id,
            run_id
        ))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchiveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArchiveKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
