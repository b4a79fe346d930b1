use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::satusehat_client::api::{ConnectionBlock, StatusResponse};
use crate::satusehat_client::core::aggregator::{aggregate, AggregateSummary};
use crate::satusehat_client::helpers::parse_timestamp;
use crate::types::MonitorError;

use super::category::{SyncCategory, DATA_SYNC, FHIR_RESOURCES, VALIDATION};

// One day; anything above is a broken probe, not a latency.
const MAX_RESPONSE_MS: f64 = 86_400_000.0;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

impl ConnectionStatus {
    fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value)
                if value.eq_ignore_ascii_case("connected")
                    || value.eq_ignore_ascii_case("online")
                    || value.eq_ignore_ascii_case("ok") =>
            {
                ConnectionStatus::Connected
            }
            _ => ConnectionStatus::Disconnected,
        }
    }
}

/// Link health between the hospital system and the registry.
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct ConnectionState {
    pub status: ConnectionStatus,
    #[serde(rename = "response_time_ms", serialize_with = "serialize_millis")]
    pub response_time: Duration,
    /// Percent, 0..=100.
    pub uptime: f64,
}

impl ConnectionState {
    fn from_block(block: Option<&ConnectionBlock>) -> Result<Self, MonitorError> {
        let block = block
            .ok_or_else(|| MonitorError::Validation("connection block is missing".to_string()))?;

        let response_time = match block.response_time {
            Some(ms) if ms.is_finite() && (0.0..=MAX_RESPONSE_MS).contains(&ms) => {
                Duration::from_micros((ms * 1000.0).round() as u64)
            }
            Some(ms) => {
                return Err(MonitorError::Validation(format!(
                    "connection.responseTime is invalid ({ms})"
                )))
            }
            None => Duration::ZERO,
        };

        let uptime = match block.uptime {
            Some(value) if (0.0..=100.0).contains(&value) => value,
            Some(value) => {
                return Err(MonitorError::Validation(format!(
                    "connection.uptime out of range ({value})"
                )))
            }
            None => 0.0,
        };

        Ok(Self {
            status: ConnectionStatus::from_wire(block.status.as_deref()),
            response_time,
            uptime,
        })
    }
}

fn serialize_millis<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_millis().min(u64::MAX as u128) as u64)
}

/// Snapshot of the synchronization state as reported by the server.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SyncReport {
    pub categories: Vec<SyncCategory>,
    pub connection: ConnectionState,
    pub last_sync: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
}

impl SyncReport {
    pub fn from_response(
        response: &StatusResponse,
        fetched_at: DateTime<Utc>,
    ) -> Result<Self, MonitorError> {
        let categories = vec![
            SyncCategory::from_counts(DATA_SYNC, response.data_sync.as_ref())?,
            SyncCategory::from_counts(FHIR_RESOURCES, response.fhir_resources.as_ref())?,
            SyncCategory::from_counts(VALIDATION, response.validation.as_ref())?,
        ];
        let connection = ConnectionState::from_block(response.connection.as_ref())?;
        let last_sync = match response.last_sync.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(parse_timestamp("lastSync", raw)?),
            _ => None,
        };

        Ok(Self {
            categories,
            connection,
            last_sync,
            fetched_at,
        })
    }

    /// All-zero report for renderers that need numbers while nothing is known.
    pub fn zeroed() -> Self {
        Self {
            categories: vec![
                SyncCategory::empty(DATA_SYNC),
                SyncCategory::empty(FHIR_RESOURCES),
                SyncCategory::empty(VALIDATION),
            ],
            connection: ConnectionState::default(),
            last_sync: None,
            fetched_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn category(&self, name: &str) -> Option<&SyncCategory> {
        self.categories.iter().find(|category| category.name() == name)
    }

    pub fn summary(&self) -> AggregateSummary {
        aggregate(&self.categories)
    }
}

/// What the status view currently shows.
///
/// `Unknown` means no report has been obtained yet, which is not the same as a
/// report whose counters are all zero.
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
#[serde(tag = "state", content = "report", rename_all = "snake_case")]
pub enum StatusView {
    #[default]
    Unknown,
    Available(SyncReport),
}

impl StatusView {
    pub fn report(&self) -> Option<&SyncReport> {
        match self {
            StatusView::Unknown => None,
            StatusView::Available(report) => Some(report),
        }
    }

    pub fn report_or_zeroed(&self) -> SyncReport {
        self.report().cloned().unwrap_or_else(SyncReport::zeroed)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, StatusView::Unknown)
    }
}
