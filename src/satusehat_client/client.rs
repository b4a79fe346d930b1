use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use crate::config::Config;
use crate::types::MonitorError;

use super::api::{StatusResponse, TriggerResponse, STATUS_PATH, TRIGGER_PATH};
use super::core::http::HttpClient;
use super::models::{SessionContext, SyncReport, SyncResult};

/// The two registry-facing operations the monitor depends on.
#[async_trait]
pub trait SyncBackend: Send + Sync {
    /// Current synchronization report. Network problems are `Connection`
    /// errors, malformed payloads are `Validation` errors.
    async fn fetch_status(&self, session: &SessionContext) -> Result<SyncReport, MonitorError>;

    /// Ask the server to push pending records to Satu Sehat.
    async fn trigger_sync(&self, session: &SessionContext) -> Result<SyncResult, MonitorError>;
}

#[async_trait]
impl<T: SyncBackend + ?Sized> SyncBackend for Arc<T> {
    async fn fetch_status(&self, session: &SessionContext) -> Result<SyncReport, MonitorError> {
        (**self).fetch_status(session).await
    }

    async fn trigger_sync(&self, session: &SessionContext) -> Result<SyncResult, MonitorError> {
        (**self).trigger_sync(session).await
    }
}

/// REST client for the SIMRS Satu Sehat sync endpoints.
#[derive(Clone)]
pub struct SatuSehatClient {
    http: HttpClient,
}

impl SatuSehatClient {
    pub fn new(config: &Config) -> Result<Self, MonitorError> {
        let http = HttpClient::new(&config.api_base_url, config.request_timeout())?;
        Ok(Self { http })
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}

#[async_trait]
impl SyncBackend for SatuSehatClient {
    async fn fetch_status(&self, session: &SessionContext) -> Result<SyncReport, MonitorError> {
        let response: StatusResponse = self
            .http
            .get_json(STATUS_PATH, session)
            .await
            .map_err(|failure| failure.into_connection_error(STATUS_PATH))?;
        let report = SyncReport::from_response(&response, Utc::now())?;
        debug!(
            categories = report.categories.len(),
            last_sync = ?report.last_sync,
            "Fetched sync status"
        );
        Ok(report)
    }

    async fn trigger_sync(&self, session: &SessionContext) -> Result<SyncResult, MonitorError> {
        let response: TriggerResponse = self
            .http
            .post_json(TRIGGER_PATH, session)
            .await
            .map_err(|failure| failure.into_sync_error(TRIGGER_PATH))?;
        let result = SyncResult::from_response(&response, Utc::now())?;
        info!(completed_at = %result.completed_at, "Satu Sehat synchronization accepted");
        Ok(result)
    }
}
