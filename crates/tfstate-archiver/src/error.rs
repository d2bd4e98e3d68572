// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for tfstate-archiver.

use thiserror::Error;

use crate::control_plane::LookupError;
use crate::download::DownloadError;
use crate::storage::StorageError;

/// Failure of a single archival attempt.
///
/// Each variant corresponds to the step that aborted the attempt; later steps
/// are never run once one of these is produced.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Current state version lookup failed.
    #[error("State lookup failed: {0}")]
    Lookup(#[from] LookupError),

    /// Snapshot body download failed.
    #[error("State download failed: {0}")]
    Download(#[from] DownloadError),

    /// Object storage write failed.
    #[error("State upload failed: {0}")]
    Storage(#[from] StorageError),
}

/// Archiver errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// HTTP client construction failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type using archiver Error.
pub type Result<T> = std::result::Result<T, Error>;
