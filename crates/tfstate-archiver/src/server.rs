// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Webhook HTTP server.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `POST /`, `POST /webhook` | Receive a run notification |
//! | `GET /health` | Liveness and version |
//!
//! Notification responses carry no body: 200 when the notification was
//! ignored or archived, 400 when the body is not a JSON payload, 500 when
//! archival failed.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::archiver::{Outcome, StateArchiver};
use crate::error::Result;
use crate::payload::NotificationPayload;

/// Shared state for webhook handlers.
pub struct AppState {
    /// Archiver invoked for terminal notifications.
    pub archiver: StateArchiver,
    /// When the server started (for uptime calculation).
    pub start_time: Instant,
    /// Server version string.
    pub version: String,
}

impl AppState {
    /// Create handler state around an archiver.
    pub fn new(archiver: StateArchiver) -> Self {
        Self {
            archiver,
            start_time: Instant::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Get the server uptime in milliseconds.
    pub fn uptime_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always true while the process serves requests.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Server uptime in milliseconds.
    pub uptime_ms: u64,
    /// Object store backend in use.
    pub store: &'static str,
}

/// Build the webhook router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(receive_notification))
        .route("/webhook", post(receive_notification))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

async fn receive_notification(State(state): State<Arc<AppState>>, body: Bytes) -> StatusCode {
    let payload = match NotificationPayload::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Rejecting malformed notification");
            return StatusCode::BAD_REQUEST;
        }
    };

    match state.archiver.handle(&payload).await {
        Ok(Outcome::Skipped) => {
            debug!(
                run_id = %payload.run_id,
                run_status = payload
                    .first_notification()
                    .and_then(|n| n.run_status.as_deref())
                    .unwrap_or("<none>"),
                "Run not in a terminal state, ignoring"
            );
            StatusCode::OK
        }
        Ok(Outcome::Archived(_)) => StatusCode::OK,
        // Already logged by the archiver
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        version: state.version.clone(),
        uptime_ms: state.uptime_ms(),
        store: state.archiver.store_type(),
    })
}

/// Serve the webhook on `addr` until Ctrl-C or SIGTERM.
pub async fn serve(addr: SocketAddr, archiver: StateArchiver) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Webhook server listening");

    axum::serve(listener, router(AppState::new(archiver)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
