// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! In-memory object store.
//!
//! Keeps objects in a map instead of talking to a bucket. Nothing is ever
//! evicted, so this is meant for tests; dry-run mode uses
//! [`DiscardStore`](super::DiscardStore).

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use super::traits::*;

/// In-memory object store.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    objects: Arc<Mutex<HashMap<String, Bytes>>>,
    puts: Arc<AtomicUsize>,
    /// If true, every write and delete fails
    pub fail_by_default: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            puts: Arc::new(AtomicUsize::new(0)),
            fail_by_default: false,
        }
    }

    /// Create a store whose operations always fail.
    pub fn failing() -> Self {
        Self {
            fail_by_default: true,
            ..Self::new()
        }
    }

    /// Get a stored object.
    pub async fn get(&self, key: &str) -> Option<Bytes> {
        self.objects.lock().await.get(key).cloned()
    }

    /// All stored keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }

    /// Whether the store holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.objects.lock().await.is_empty()
    }

    /// Number of write attempts that reached the store, successful or not.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn store_type(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, key: &str, body: Bytes) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_by_default {
            return Err(StorageError::Put {
                key: key.to_string(),
                message: "memory store configured to fail".to_string(),
            });
        }
        self.objects.lock().await.insert(key.to_string(), body);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.fail_by_default {
            return Err(StorageError::Delete {
                key: key.to_string(),
                message: "memory store configured to fail".to_string(),
            });
        }
        self.objects.lock().await.remove(key);
        Ok(())
    }
}
