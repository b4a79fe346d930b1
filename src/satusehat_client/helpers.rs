use chrono::{DateTime, Utc};
use std::env;
use tokio::fs;

use crate::config::Config;
use crate::types::MonitorError;

pub const SESSION_TOKEN_ENV: &str = "SATUSEHAT_SESSION_TOKEN";

/// `round(part / whole * 100)`, 0 when `whole` is 0.
pub fn rounded_percentage(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    let ratio = part.min(whole) as f64 / whole as f64;
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, MonitorError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| MonitorError::Validation(format!("{field} is not ISO-8601 ({raw}): {err}")))
}

pub fn format_relative_time(when: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(when);
    if duration.num_seconds() < 60 {
        "just now".to_string()
    } else if duration.num_minutes() < 60 {
        format!("{} min ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{} h ago", duration.num_hours())
    } else {
        format!("{} d ago", duration.num_days())
    }
}

pub async fn load_session_token(config: &Config) -> Result<String, MonitorError> {
    if let Ok(value) = env::var(SESSION_TOKEN_ENV) {
        if !value.trim().is_empty() {
            return Ok(value.trim().to_string());
        }
    }

    let Some(path) = config.session_token_path()? else {
        return Err(MonitorError::MissingSessionToken);
    };
    let contents = fs::read_to_string(&path).await?;
    let token = contents.trim();
    if token.is_empty() {
        return Err(MonitorError::MissingSessionToken);
    }
    Ok(token.to_string())
}
