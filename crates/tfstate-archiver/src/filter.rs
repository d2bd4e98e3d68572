// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Terminal run status detection.

use crate::payload::NotificationPayload;

/// Status substrings marking a run that finished and may have changed state.
pub const TERMINAL_STATUS_MARKERS: [&str; 2] = ["errored", "applied"];

/// Returns true if the payload reports a terminal, state-affecting run status.
///
/// Only the first notification entry is examined. The match is a
/// case-sensitive substring match against [`TERMINAL_STATUS_MARKERS`]; an
/// empty notification list or a missing status is never terminal.
pub fn is_terminal(payload: &NotificationPayload) -> bool {
    payload
        .first_notification()
        .and_then(|n| n.run_status.as_deref())
        .is_some_and(is_terminal_status)
}

/// Returns true if a single run status string is terminal.
pub fn is_terminal_status(status: &str) -> bool {
    TERMINAL_STATUS_MARKERS
        .iter()
        .any(|marker| status.contains(marker))
}
