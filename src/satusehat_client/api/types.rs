use serde::Deserialize;

/// Body of `GET /sync/status`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[serde(default)]
    pub data_sync: Option<CountsBlock>,
    #[serde(default)]
    pub fhir_resources: Option<CountsBlock>,
    #[serde(default)]
    pub connection: Option<ConnectionBlock>,
    #[serde(default)]
    pub validation: Option<CountsBlock>,
    #[serde(default)]
    pub last_sync: Option<String>,
}

/// Record counters for one category. Signed so that negative counts reach
/// validation instead of failing inside serde.
#[derive(Debug, Deserialize, Default, Clone, Copy)]
pub struct CountsBlock {
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(default, alias = "valid")]
    pub synced: Option<i64>,
    // Recomputed locally; the server value is informational only.
    #[allow(dead_code)]
    #[serde(default)]
    pub percentage: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionBlock {
    #[serde(default)]
    pub status: Option<String>,
    /// Milliseconds.
    #[serde(default)]
    pub response_time: Option<f64>,
    #[serde(default)]
    pub uptime: Option<f64>,
}

/// Body of `POST /sync/trigger`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub sync_time: Option<String>,
}

/// Error envelope some deployments return alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default, alias = "error")]
    pub message: Option<String>,
}
