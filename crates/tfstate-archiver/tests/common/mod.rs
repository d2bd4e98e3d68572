// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure for tfstate-archiver tests.
//!
//! Provides a wiremock-backed control plane and helpers to build archivers
//! that write into a MemoryStore.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tfstate_archiver::control_plane::TfeClient;
use tfstate_archiver::download::HttpDownloader;
use tfstate_archiver::storage::MemoryStore;
use tfstate_archiver::{NotificationPayload, StateArchiver};

/// Token the mock control plane accepts.
pub const TOKEN: &str = "test-token";

/// Raw state body served by the mock download endpoint.
pub const STATE_BODY: &[u8] =
    br#"{"version":4,"terraform_version":"1.7.4","serial":5,"lineage":"3f1c","outputs":{},"resources":[]}"#;

/// Path of a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Raw bytes of a fixture file.
pub fn fixture_bytes(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name)).expect("fixture readable")
}

/// Parsed fixture payload.
pub fn fixture_payload(name: &str) -> NotificationPayload {
    NotificationPayload::from_slice(&fixture_bytes(name)).expect("fixture parses")
}

/// URL path of the current-state-version endpoint for a workspace.
pub fn state_version_path(workspace_id: &str) -> String {
    format!("/api/v2/workspaces/{}/current-state-version", workspace_id)
}

/// URL path of the download endpoint for a state version.
pub fn download_path(state_id: &str) -> String {
    format!("/state-versions/{}/download", state_id)
}

/// Mount a current-state-version response for `workspace_id`.
///
/// The download URL points back at the same mock server.
pub async fn mount_state_version(
    server: &MockServer,
    workspace_id: &str,
    state_id: &str,
    serial: i64,
    created_at: &str,
) {
    Mock::given(method("GET"))
        .and(path(state_version_path(workspace_id)))
        .and(header("Authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": state_id,
                "type": "state-versions",
                "attributes": {
                    "created-at": created_at,
                    "serial": serial,
                    "hosted-state-download-url":
                        format!("{}{}", server.uri(), download_path(state_id))
                }
            }
        })))
        .mount(server)
        .await;
}

/// Mount a download endpoint serving [`STATE_BODY`].
pub async fn mount_download(server: &MockServer, state_id: &str) {
    Mock::given(method("GET"))
        .and(path(download_path(state_id)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(STATE_BODY))
        .mount(server)
        .await;
}

/// Mount the `acme/net` workspace: state `sv-123`, serial 5, created 2024-03-01.
pub async fn mount_net_workspace(server: &MockServer) {
    mount_state_version(server, "ws-net", "sv-123", 5, "2024-03-01T10:02:31.000Z").await;
    mount_download(server, "sv-123").await;
}

/// Build an archiver that talks to `server` and writes into `store`.
pub fn archiver_for(server: &MockServer, store: MemoryStore) -> StateArchiver {
    let lookup = TfeClient::new(server.uri(), TOKEN, Duration::from_secs(5)).expect("tfe client");
    let downloader = HttpDownloader::new(Duration::from_secs(5)).expect("downloader");
    StateArchiver::new(Arc::new(lookup), Arc::new(downloader), Arc::new(store))
}
