// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Snapshot body download.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from snapshot downloads.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The request could not be sent.
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Download returned status {0}")]
    Status(u16),

    /// The response body could not be read.
    #[error("Failed to read body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Capability to fetch a state snapshot body.
#[async_trait]
pub trait SnapshotDownloader: Send + Sync {
    /// Download the raw bytes behind `url`.
    async fn download(&self, url: &str) -> Result<Bytes, DownloadError>;
}

/// Plain HTTP GET downloader.
///
/// Download URLs handed out by the control plane are pre-signed, so no
/// credential is attached.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    http: reqwest::Client,
}

impl HttpDownloader {
    /// Create a downloader with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl SnapshotDownloader for HttpDownloader {
    #[instrument(skip_all)]
    async fn download(&self, url: &str) -> Result<Bytes, DownloadError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(DownloadError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(DownloadError::Body)?;
        debug!(bytes = body.len(), "Downloaded state snapshot");
        Ok(body)
    }
}
