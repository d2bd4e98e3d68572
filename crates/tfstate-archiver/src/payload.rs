// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Inbound run notification payload.
//!
//! Mirrors the JSON body the Terraform control plane posts to generic webhook
//! destinations. Verification deliveries send `null` for every run field, so
//! all fields decode leniently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// A run notification delivered by the control plane.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NotificationPayload {
    /// Payload schema version
    #[serde(deserialize_with = "null_as_default")]
    pub payload_version: i64,
    /// Notification configuration that produced this delivery
    #[serde(deserialize_with = "null_as_default")]
    pub notification_configuration_id: String,
    /// Link to the run in the control plane UI
    #[serde(deserialize_with = "null_as_default")]
    pub run_url: String,
    /// Run identifier
    #[serde(deserialize_with = "null_as_default")]
    pub run_id: String,
    /// Run message
    #[serde(deserialize_with = "null_as_default")]
    pub run_message: String,
    /// When the run was created
    pub run_created_at: Option<DateTime<Utc>>,
    /// Who created the run
    #[serde(deserialize_with = "null_as_default")]
    pub run_created_by: String,
    /// Workspace identifier
    #[serde(deserialize_with = "null_as_default")]
    pub workspace_id: String,
    /// Workspace name
    #[serde(deserialize_with = "null_as_default")]
    pub workspace_name: String,
    /// Organization name
    #[serde(deserialize_with = "null_as_default")]
    pub organization_name: String,
    /// Notification entries, newest first
    #[serde(deserialize_with = "null_as_default")]
    pub notifications: Vec<Notification>,
}

/// A single notification entry within a payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Notification {
    /// Human readable message
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    /// Trigger that fired (e.g. "run:completed", "verification")
    #[serde(deserialize_with = "null_as_default")]
    pub trigger: String,
    /// Run status at the time of the notification
    pub run_status: Option<String>,
    /// When the run status last changed
    pub run_updated_at: Option<DateTime<Utc>>,
    /// Who last changed the run
    #[serde(deserialize_with = "null_as_default")]
    pub run_updated_by: String,
}

/// Payload parsing failures.
#[derive(Debug, thiserror::Error)]
pub enum PayloadParseError {
    /// The body is not valid JSON or has mistyped fields.
    #[error("Malformed notification payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The body is valid JSON but not an object.
    #[error("Notification payload must be a JSON object")]
    NotAnObject,
}

impl NotificationPayload {
    /// Parse a payload from a raw JSON request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, PayloadParseError> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(PayloadParseError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// The first notification entry, if any.
    pub fn first_notification(&self) -> Option<&Notification> {
        self.notifications.first()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
