use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the Satu Sehat sync monitor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_refresh_after_sync")]
    pub refresh_after_sync: bool,

    #[serde(default)]
    pub session_token_file: Option<String>,

    #[serde(default)]
    pub facility_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            refresh_after_sync: default_refresh_after_sync(),
            session_token_file: None,
            facility_id: None,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:8080/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    8
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_refresh_after_sync() -> bool {
    true
}
