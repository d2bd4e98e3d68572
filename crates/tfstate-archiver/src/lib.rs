// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! tfstate-archiver - Terraform State Archival Webhook
//!
//! Receives run notifications from Terraform Cloud / Enterprise. When a run
//! reaches a terminal status (`applied` or `errored`), the workspace's current
//! state version is downloaded and written to an S3 bucket.
//!
//! # Flow
//!
//! ```text
//!  Terraform Cloud ──POST──▶ server ──▶ filter ──(terminal)──▶ archiver
//!                                                                │
//!                        ┌───────────────────────┬───────────────┤
//!                        ▼                       ▼               ▼
//!              current-state-version      state download     S3 PutObject
//!                  (control_plane)          (download)        (storage)
//! ```
//!
//! Only the first notification entry of a payload is inspected.
//!
//! # Archive Keys
//!
//! ```text
//! {organization}/{workspace}/{YYYY}/{MM}/{DD}/{workspace}-{serial}-{state_id}-{run_id}.json
//! ```
//!
//! Redelivery of the same notification overwrites the same object.
//!
//! # Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `TF_TOKEN` | Yes* | - | Control plane API token |
//! | `TFE_TOKEN` | Yes* | - | Fallback if above not set |
//! | `BUCKET` | Yes | - | Target S3 bucket |
//! | `TFE_ADDRESS` | No | `https://app.terraform.io` | Control plane base URL |
//! | `ARCHIVER_PORT` | No | `8080` | HTTP listen port |
//! | `ARCHIVER_HTTP_TIMEOUT_MS` | No | `30000` | Outbound HTTP timeout |
//! | `ARCHIVER_DRY_RUN` | No | `false` | Log writes instead of uploading |
//! | `ARCHIVER_LOG_FORMAT` | No | `text` | `json` for structured logs |
//!
//! AWS credentials and region follow the standard AWS environment.

#![deny(missing_docs)]

/// Server configuration loaded from environment variables.
pub mod config;

/// Error types for archiver operations.
pub mod error;

/// Inbound notification payload.
pub mod payload;

/// Terminal run status detection.
pub mod filter;

/// Deterministic archive keys.
pub mod archive_key;

/// Control plane state version lookup.
pub mod control_plane;

/// State snapshot download.
pub mod download;

/// Object storage backends (S3, in-memory, dry-run).
pub mod storage;

/// Orchestration of lookup, download and upload.
pub mod archiver;

/// Webhook HTTP server.
pub mod server;

pub use archive_key::ArchiveKey;
pub use archiver::{Outcome, StateArchiver};
pub use config::Config;
pub use error::{ArchiveError, Error};
pub use payload::{Notification, NotificationPayload};
