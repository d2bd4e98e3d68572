// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Tests for state archival against a mock control plane.

mod common;

use common::{
    STATE_BODY, archiver_for, download_path, fixture_payload, mount_net_workspace,
    mount_state_version, state_version_path,
};
use tfstate_archiver::control_plane::LookupError;
use tfstate_archiver::download::DownloadError;
use tfstate_archiver::storage::{MemoryStore, ObjectStore};
use tfstate_archiver::{ArchiveError, Config, Outcome, StateArchiver};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_archive_applied_run() {
    let server = MockServer::start().await;
    mount_net_workspace(&server).await;
    let store = MemoryStore::new();
    let archiver = archiver_for(&server, store.clone());

    let key = archiver
        .archive(&fixture_payload("event_applied.json"))
        .await
        .unwrap();

    assert_eq!(key.as_str(), "acme/net/2024/03/01/net-5-sv-123-run-9.json");
    assert_eq!(store.keys().await, vec![key.to_string()]);
    assert_eq!(store.get(key.as_str()).await.unwrap().as_ref(), STATE_BODY);
}

#[tokio::test]
async fn test_handle_archives_errored_run() {
    let server = MockServer::start().await;
    mount_net_workspace(&server).await;
    let store = MemoryStore::new();
    let archiver = archiver_for(&server, store.clone());

    let outcome = archiver
        .handle(&fixture_payload("event_errored.json"))
        .await
        .unwrap();

    match outcome {
        Outcome::Archived(key) => {
            assert_eq!(key.as_str(), "acme/net/2024/03/01/net-5-sv-123-run-10.json")
        }
        Outcome::Skipped => panic!("errored run should be archived"),
    }
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_handle_skips_non_terminal_without_io() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let archiver = archiver_for(&server, store.clone());

    for fixture in [
        "event_planning.json",
        "event_not_modified.json",
        "event_verification.json",
    ] {
        let outcome = archiver.handle(&fixture_payload(fixture)).await.unwrap();
        assert_eq!(outcome, Outcome::Skipped, "{}", fixture);
    }

    assert_eq!(store.put_count(), 0);
}

#[tokio::test]
async fn test_rearchive_is_idempotent() {
    let server = MockServer::start().await;
    mount_net_workspace(&server).await;
    let store = MemoryStore::new();
    let archiver = archiver_for(&server, store.clone());
    let payload = fixture_payload("event_applied.json");

    let first = archiver.archive(&payload).await.unwrap();
    let second = archiver.archive(&payload).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(store.put_count(), 2);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_concurrent_redeliveries_converge() {
    let server = MockServer::start().await;
    mount_net_workspace(&server).await;
    let store = MemoryStore::new();
    let archiver = archiver_for(&server, store.clone());
    let payload = fixture_payload("event_applied.json");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let archiver = archiver.clone();
            let payload = payload.clone();
            tokio::spawn(async move { archiver.archive(&payload).await })
        })
        .collect();

    for handle in handles {
        let key = handle.await.unwrap().unwrap();
        assert_eq!(key.as_str(), "acme/net/2024/03/01/net-5-sv-123-run-9.json");
    }
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_lookup_failure_skips_download_and_write() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(state_version_path("ws-gone")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(download_path("sv-123")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(STATE_BODY))
        .expect(0)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let archiver = archiver_for(&server, store.clone());

    let err = archiver
        .handle(&fixture_payload("event_unknown_workspace.json"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ArchiveError::Lookup(LookupError::WorkspaceNotFound(_))
    ));
    assert_eq!(store.put_count(), 0);
}

#[tokio::test]
async fn test_download_failure_skips_write() {
    let server = MockServer::start().await;
    mount_state_version(&server, "ws-net", "sv-123", 5, "2024-03-01T10:02:31Z").await;

    Mock::given(method("GET"))
        .and(path(download_path("sv-123")))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let archiver = archiver_for(&server, store.clone());

    let err = archiver
        .archive(&fixture_payload("event_applied.json"))
        .await
        .unwrap_err();

    assert!(matches!(err, ArchiveError::Download(DownloadError::Status(500))));
    assert_eq!(store.put_count(), 0);
}

#[tokio::test]
async fn test_storage_failure_reported() {
    let server = MockServer::start().await;
    mount_net_workspace(&server).await;

    let store = MemoryStore::failing();
    let archiver = archiver_for(&server, store.clone());

    let err = archiver
        .archive(&fixture_payload("event_applied.json"))
        .await
        .unwrap_err();

    assert!(matches!(err, ArchiveError::Storage(_)));
    assert_eq!(store.put_count(), 1);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_archive_then_delete() {
    let server = MockServer::start().await;
    mount_net_workspace(&server).await;

    let store = MemoryStore::new();
    let archiver = archiver_for(&server, store.clone());

    let key = archiver
        .archive(&fixture_payload("event_applied.json"))
        .await
        .unwrap();
    assert_eq!(archiver.store_type(), "memory");

    store.delete(key.as_str()).await.unwrap();
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_dry_run_discards_archives() {
    let config = Config::new(common::TOKEN, "unused-bucket").with_dry_run(true);
    let archiver = StateArchiver::from_config(&config).await.unwrap();
    assert_eq!(archiver.store_type(), "discard");
}
