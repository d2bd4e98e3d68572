// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! State archival.
//!
//! Looks up the current state version of the notified workspace, downloads
//! its body and writes it to object storage under its [`ArchiveKey`].

use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::archive_key::ArchiveKey;
use crate::config::Config;
use crate::control_plane::{StateLookup, TfeClient};
use crate::download::{HttpDownloader, SnapshotDownloader};
use crate::error::{ArchiveError, Result};
use crate::filter;
use crate::payload::NotificationPayload;
use crate::storage::{DiscardStore, ObjectStore, S3Store};

/// What happened to a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The run is not in a terminal state; nothing was fetched or written.
    Skipped,
    /// The state snapshot was stored under this key.
    Archived(ArchiveKey),
}

/// Archives state snapshots for finished runs.
///
/// Holds no mutable state; concurrent calls are independent and converge on
/// the same object when they archive the same run and state version.
#[derive(Clone)]
pub struct StateArchiver {
    lookup: Arc<dyn StateLookup>,
    downloader: Arc<dyn SnapshotDownloader>,
    store: Arc<dyn ObjectStore>,
}

impl StateArchiver {
    /// Create an archiver over the given collaborators.
    pub fn new(
        lookup: Arc<dyn StateLookup>,
        downloader: Arc<dyn SnapshotDownloader>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            lookup,
            downloader,
            store,
        }
    }

    /// Build the production collaborators from configuration.
    ///
    /// Uses S3 for storage unless `dry_run` is set, in which case writes are
    /// logged and discarded.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let lookup = Arc::new(TfeClient::from_config(config)?);
        let downloader = Arc::new(HttpDownloader::new(config.http_timeout)?);
        let store: Arc<dyn ObjectStore> = if config.dry_run {
            Arc::new(DiscardStore::new())
        } else {
            Arc::new(S3Store::from_env(config.bucket.clone()).await)
        };

        Ok(Self::new(lookup, downloader, store))
    }

    /// Object store type in use.
    pub fn store_type(&self) -> &'static str {
        self.store.store_type()
    }

    /// Archive the payload's state if its run reached a terminal status.
    pub async fn handle(
        &self,
        payload: &NotificationPayload,
    ) -> std::result::Result<Outcome, ArchiveError> {
        if !filter::is_terminal(payload) {
            return Ok(Outcome::Skipped);
        }
        self.archive(payload).await.map(Outcome::Archived)
    }

    /// Archive the current state of the payload's workspace.
    ///
    /// Steps run in order (lookup, download, write) and the first failure
    /// aborts the rest.
    #[instrument(
        skip_all,
        fields(
            workspace_id = %payload.workspace_id,
            workspace = %payload.workspace_name,
            run_id = %payload.run_id,
        )
    )]
    pub async fn archive(
        &self,
        payload: &NotificationPayload,
    ) -> std::result::Result<ArchiveKey, ArchiveError> {
        let result = self.archive_inner(payload).await;
        match &result {
            Ok(key) => info!(key = %key, "Terraform state saved"),
            Err(e) => error!(error = %e, "Failed to archive Terraform state"),
        }
        result
    }

    async fn archive_inner(
        &self,
        payload: &NotificationPayload,
    ) -> std::result::Result<ArchiveKey, ArchiveError> {
        let state = self
            .lookup
            .current_state_version(&payload.workspace_id)
            .await?;

        let key = ArchiveKey::new(
            &payload.organization_name,
            &payload.workspace_name,
            state.created_at,
            state.serial,
            &state.id,
            &payload.run_id,
        );

        let body = self.downloader.download(&state.download_url).await?;
        self.store.put(key.as_str(), body).await?;

        Ok(key)
    }
}
