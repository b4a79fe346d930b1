use crate::config::Config;
use crate::satusehat_client::helpers::load_session_token;
use crate::types::MonitorError;

/// Caller identity threaded explicitly through every status and sync request.
#[derive(Clone)]
pub struct SessionContext {
    pub token: String,
    pub facility_id: Option<String>,
}

impl SessionContext {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            facility_id: None,
        }
    }

    pub fn with_facility(mut self, facility_id: impl Into<String>) -> Self {
        self.facility_id = Some(facility_id.into());
        self
    }

    /// Session from env/token file plus the configured facility.
    pub async fn from_config(config: &Config) -> Result<Self, MonitorError> {
        let token = load_session_token(config).await?;
        Ok(Self {
            token,
            facility_id: config.facility_id.clone(),
        })
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("token", &"<redacted>")
            .field("facility_id", &self.facility_id)
            .finish()
    }
}
