// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Control plane state lookup.
//!
//! Resolves the current state version of a workspace through the Terraform
//! Cloud / Enterprise v2 API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::Config;

/// Media type used by the control plane API.
const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";

/// Descriptor of a workspace's current state version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateVersion {
    /// State version identifier (e.g. "sv-...")
    pub id: String,
    /// Monotonic state serial number
    pub serial: i64,
    /// When the state version was created
    pub created_at: DateTime<Utc>,
    /// Pre-signed URL for the raw state body
    pub download_url: String,
}

/// Errors from state version lookups.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LookupError {
    /// The workspace is unknown or has no state.
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),

    /// The workspace id contains characters the API never issues.
    #[error("Invalid workspace id: {0:?}")]
    InvalidWorkspaceId(String),

    /// The credential was rejected.
    #[error("Unauthorized: control plane rejected the API token")]
    Unauthorized,

    /// The control plane answered with an unexpected status.
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The control plane could not be reached.
    #[error("Control plane unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The response could not be decoded into a state version.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Capability to look up the current state version of a workspace.
#[async_trait]
pub trait StateLookup: Send + Sync {
    /// Fetch the current state version descriptor for `workspace_id`.
    async fn current_state_version(
        &self,
        workspace_id: &str,
    ) -> Result<StateVersion, LookupError>;
}

#[derive(Debug, Deserialize)]
struct StateVersionDocument {
    data: StateVersionData,
}

#[derive(Debug, Deserialize)]
struct StateVersionData {
    id: String,
    attributes: StateVersionAttributes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct StateVersionAttributes {
    serial: i64,
    created_at: DateTime<Utc>,
    hosted_state_download_url: Option<String>,
}

impl TryFrom<StateVersionDocument> for StateVersion {
    type Error = LookupError;

    fn try_from(doc: StateVersionDocument) -> Result<Self, Self::Error> {
        let download_url = doc
            .data
            .attributes
            .hosted_state_download_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                LookupError::InvalidResponse(format!(
                    "state version {} has no download URL",
                    doc.data.id
                ))
            })?;

        Ok(Self {
            id: doc.data.id,
            serial: doc.data.attributes.serial,
            created_at: doc.data.attributes.created_at,
            download_url,
        })
    }
}

/// HTTP client for the Terraform control plane API.
#[derive(Clone)]
pub struct TfeClient {
    http: reqwest::Client,
    address: String,
    token: String,
}

impl std::fmt::Debug for TfeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfeClient")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl TfeClient {
    /// Create a client for the API at `address` authenticated with `token`.
    pub fn new(
        address: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            address: address.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Create a client from the archiver configuration.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(
            config.tfe_address.clone(),
            config.tfe_token.clone(),
            config.http_timeout,
        )
    }

    /// Callers must pass an id accepted by [`is_valid_workspace_id`].
    fn current_state_version_url(&self, workspace_id: &str) -> String {
        format!(
            "{}/api/v2/workspaces/{}/current-state-version",
            self.address, workspace_id
        )
    }
}

/// Whether `id` can be placed into a request path as a single segment.
///
/// Accepts ASCII letters, digits, `-`, `.` and `_`, and rejects ids made only
/// of dots.
pub fn is_valid_workspace_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))
        && !id.chars().all(|c| c == '.')
}

#[async_trait]
impl StateLookup for TfeClient {
    #[instrument(skip(self))]
    async fn current_state_version(
        &self,
        workspace_id: &str,
    ) -> Result<StateVersion, LookupError> {
        if workspace_id.is_empty() {
            return Err(LookupError::WorkspaceNotFound(String::new()));
        }
        if !is_valid_workspace_id(workspace_id) {
            return Err(LookupError::InvalidWorkspaceId(workspace_id.to_string()));
        }

        let response = self
            .http
            .get(self.current_state_version_url(workspace_id))
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, JSON_API_CONTENT_TYPE)
            .send()
            .await
            .map_err(LookupError::Unreachable)?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => {
                return Err(LookupError::WorkspaceNotFound(workspace_id.to_string()));
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(LookupError::Unauthorized);
            }
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(LookupError::UnexpectedStatus {
                    status: s.as_u16(),
                    body,
                });
            }
            _ => {}
        }

        let document: StateVersionDocument = response
            .json()
            .await
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;

        let state = StateVersion::try_from(document)?;
        debug!(state_id = %state.id, serial = state.serial, "Resolved current state version");
        Ok(state)
    }
}
