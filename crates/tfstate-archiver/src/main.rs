// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! tfstate-archiver - Terraform State Archival Webhook
//!
//! An HTTP server that receives Terraform run notifications and stores the
//! resulting state snapshots in S3.

use tracing::{info, warn};

use tfstate_archiver::config::Config;
use tfstate_archiver::server;
use tfstate_archiver::StateArchiver;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tfstate_archiver=info,tower_http=info".into());
    let json = std::env::var("ARCHIVER_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    if let Err(e) = dotenv {
        warn!("No .env file loaded: {}", e);
    }

    // Load configuration
    let config = Config::from_env()?;

    info!(
        listen_addr = %config.listen_addr,
        tfe_address = %config.tfe_address,
        bucket = %config.bucket,
        dry_run = config.dry_run,
        "Starting tfstate-archiver"
    );

    let archiver = StateArchiver::from_config(&config).await?;
    info!(store = archiver.store_type(), "Archiver initialized");

    server::serve(config.listen_addr, archiver).await?;

    info!("tfstate-archiver shut down");

    Ok(())
}
