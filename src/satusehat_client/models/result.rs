use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::satusehat_client::api::TriggerResponse;
use crate::satusehat_client::helpers::parse_timestamp;
use crate::types::MonitorError;

/// Outcome of one manual synchronization request.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SyncResult {
    pub success: bool,
    pub message: String,
    pub completed_at: DateTime<Utc>,
}

impl SyncResult {
    /// Converts a trigger response; `success: false` becomes a sync error.
    pub fn from_response(
        response: &TriggerResponse,
        received_at: DateTime<Utc>,
    ) -> Result<Self, MonitorError> {
        let message = response
            .message
            .as_deref()
            .map(str::trim)
            .filter(|msg| !msg.is_empty())
            .map(str::to_string);

        if !response.success {
            return Err(MonitorError::Sync(message.unwrap_or_else(|| {
                "server reported an unsuccessful synchronization".to_string()
            })));
        }

        let completed_at = match response.sync_time.as_deref() {
            Some(raw) if !raw.trim().is_empty() => parse_timestamp("syncTime", raw)?,
            _ => received_at,
        };

        Ok(Self {
            success: true,
            message: message.unwrap_or_else(|| "Synchronization completed".to_string()),
            completed_at,
        })
    }

    pub fn failed(message: impl Into<String>, completed_at: DateTime<Utc>) -> Self {
        Self {
            success: false,
            message: message.into(),
            completed_at,
        }
    }
}
