// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for tfstate-archiver.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

/// Default Terraform Cloud API address.
pub const DEFAULT_TFE_ADDRESS: &str = "https://app.terraform.io";

/// Archiver configuration loaded from environment variables.
///
/// Loaded once at startup and handed to the collaborators explicitly.
#[derive(Clone)]
pub struct Config {
    /// API token for the Terraform control plane
    pub tfe_token: String,
    /// Base URL of the Terraform control plane
    pub tfe_address: String,
    /// Target S3 bucket for archived state
    pub bucket: String,
    /// HTTP listen address for the webhook server
    pub listen_addr: SocketAddr,
    /// Timeout applied to outbound HTTP requests
    pub http_timeout: Duration,
    /// Log archive writes instead of uploading to S3
    pub dry_run: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("tfe_token", &"<redacted>")
            .field("tfe_address", &self.tfe_address)
            .field("bucket", &self.bucket)
            .field("listen_addr", &self.listen_addr)
            .field("http_timeout", &self.http_timeout)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Config {
    /// Create a configuration with defaults for everything but the credential and bucket.
    pub fn new(tfe_token: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            tfe_token: tfe_token.into(),
            tfe_address: DEFAULT_TFE_ADDRESS.to_string(),
            bucket: bucket.into(),
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            http_timeout: Duration::from_secs(30),
            dry_run: false,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TF_TOKEN` (or `TFE_TOKEN`): control plane API token, required
    /// - `BUCKET`: target S3 bucket, required
    /// - `TFE_ADDRESS`: control plane base URL (default: "https://app.terraform.io")
    /// - `ARCHIVER_PORT`: HTTP listen port (default: 8080)
    /// - `ARCHIVER_HTTP_TIMEOUT_MS`: outbound HTTP timeout in milliseconds (default: 30000)
    /// - `ARCHIVER_DRY_RUN`: log writes instead of uploading (default: "false")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tfe_token = lookup("TF_TOKEN")
            .or_else(|| lookup("TFE_TOKEN"))
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingEnvVar("TF_TOKEN or TFE_TOKEN"))?;

        let bucket = lookup("BUCKET")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingEnvVar("BUCKET"))?;

        let tfe_address = lookup("TFE_ADDRESS")
            .unwrap_or_else(|| DEFAULT_TFE_ADDRESS.to_string())
            .trim_end_matches('/')
            .to_string();

        let port: u16 = lookup("ARCHIVER_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let timeout_ms: u64 = lookup("ARCHIVER_HTTP_TIMEOUT_MS")
            .unwrap_or_else(|| "30000".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("ARCHIVER_HTTP_TIMEOUT_MS", format!("{}", e))
            })?;

        let dry_run = lookup("ARCHIVER_DRY_RUN")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            tfe_token,
            tfe_address,
            bucket,
            listen_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            http_timeout: Duration::from_millis(timeout_ms),
            dry_run,
        })
    }

    /// Set the control plane base URL.
    pub fn with_tfe_address(mut self, address: impl Into<String>) -> Self {
        self.tfe_address = address.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the listen address.
    pub fn with_listen_addr(mut self, addr: SocketAddr) -> Self {
        self.listen_addr = addr;
        self
    }

    /// Set the outbound HTTP timeout.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Enable or disable dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
    /// The port number is invalid.
    #[error("Invalid port number")]
    InvalidPort,
    /// A variable holds a value that cannot be parsed.
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
