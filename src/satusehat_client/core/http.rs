use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::satusehat_client::api::ErrorEnvelope;
use crate::satusehat_client::models::SessionContext;
use crate::types::MonitorError;

const FACILITY_HEADER: &str = "X-Facility-Id";

/// Ways a request can fail before a typed body is available.
#[derive(Debug)]
pub enum HttpFailure {
    Transport(reqwest::Error),
    Status { status: StatusCode, message: String },
    Decode(String),
}

impl HttpFailure {
    /// Classification for the status endpoint.
    pub fn into_connection_error(self, path: &str) -> MonitorError {
        match self {
            HttpFailure::Transport(err) if err.is_timeout() => {
                MonitorError::Connection(format!("{path} timed out"))
            }
            HttpFailure::Transport(err) => MonitorError::Connection(format!("{path}: {err}")),
            HttpFailure::Status { status, message } => {
                MonitorError::Connection(format!("{path} returned {status}: {message}"))
            }
            HttpFailure::Decode(message) => MonitorError::Validation(message),
        }
    }

    /// Classification for the sync trigger endpoint.
    pub fn into_sync_error(self, path: &str) -> MonitorError {
        match self {
            HttpFailure::Transport(err) if err.is_timeout() => {
                MonitorError::Sync(format!("{path} timed out"))
            }
            HttpFailure::Transport(err) => MonitorError::Sync(format!("{path}: {err}")),
            HttpFailure::Status { status, message } => {
                MonitorError::Sync(format!("{message} ({status})"))
            }
            HttpFailure::Decode(message) => MonitorError::Validation(message),
        }
    }
}

/// Thin JSON-over-HTTP wrapper bound to the SIMRS API base URL.
#[derive(Clone, Debug)]
pub struct HttpClient {
    http: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, MonitorError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(MonitorError::Config(format!(
                "API base URL must start with http:// or https:// (got {base_url:?})"
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(MonitorError::Http)?;

        Ok(Self {
            http,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get_json<T>(&self, path: &str, session: &SessionContext) -> Result<T, HttpFailure>
    where
        T: DeserializeOwned,
    {
        let request = self.http.get(self.url(path));
        self.send_json(request, path, session).await
    }

    pub async fn post_json<T>(&self, path: &str, session: &SessionContext) -> Result<T, HttpFailure>
    where
        T: DeserializeOwned,
    {
        let request = self
            .http
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .body("{}");
        self.send_json(request, path, session).await
    }

    async fn send_json<T>(
        &self,
        request: RequestBuilder,
        path: &str,
        session: &SessionContext,
    ) -> Result<T, HttpFailure>
    where
        T: DeserializeOwned,
    {
        let mut request = request.bearer_auth(&session.token);
        if let Some(facility) = session.facility_id.as_deref() {
            request = request.header(FACILITY_HEADER, facility);
        }

        let response = request.send().await.map_err(HttpFailure::Transport)?;
        let status = response.status();
        let body = response.text().await.map_err(HttpFailure::Transport)?;

        if !status.is_success() {
            return Err(HttpFailure::Status {
                status,
                message: error_message(&body, status),
            });
        }

        serde_json::from_str::<T>(&body)
            .map_err(|err| HttpFailure::Decode(format!("{path} returned malformed JSON: {err}")))
    }
}

fn error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            let text = body.trim();
            if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                text.chars().take(200).collect()
            }
        })
}
