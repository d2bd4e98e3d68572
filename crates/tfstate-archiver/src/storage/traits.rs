// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Object store trait definitions.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Errors from object store operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// Writing an object failed.
    #[error("Failed to write {key}: {message}")]
    Put {
        /// Object key.
        key: String,
        /// Backend error description.
        message: String,
    },

    /// Deleting an object failed.
    #[error("Failed to delete {key}: {message}")]
    Delete {
        /// Object key.
        key: String,
        /// Backend error description.
        message: String,
    },
}

/// Result type for object store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Trait for object stores.
///
/// A store is bound to a single bucket/container at construction time; keys
/// are relative to it. Writes overwrite any existing object under the same key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store type identifier (e.g., "s3", "memory")
    fn store_type(&self) -> &'static str;

    /// Write `body` under `key`, replacing any previous object.
    async fn put(&self, key: &str, body: Bytes) -> Result<()>;

    /// Remove the object under `key`.
    async fn delete(&self, key: &str) -> Result<()>;
}
