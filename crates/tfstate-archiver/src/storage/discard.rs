// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Dry-run object store.
//!
//! Logs each write and drops the body. Nothing is retained, so a long-running
//! dry-run server does not grow with the number of archived runs.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;

use super::traits::*;

/// Object store that accepts every write and keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardStore;

impl DiscardStore {
    /// Create a discarding store.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ObjectStore for DiscardStore {
    fn store_type(&self) -> &'static str {
        "discard"
    }

    async fn put(&self, key: &str, body: Bytes) -> Result<()> {
        info!(key = %key, bytes = body.len(), "Dry run: state not uploaded");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        info!(key = %key, "Dry run: state not deleted");
        Ok(())
    }
}
