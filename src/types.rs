use thiserror::Error;

/// Errors surfaced by the sync monitor and its HTTP client.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Status endpoint unreachable, timed out or answered with a non-success status.
    #[error("connection error: {0}")]
    Connection(String),

    /// Sync trigger failed server-side or at the network level.
    #[error("sync failed: {0}")]
    Sync(String),

    /// Server response was malformed (missing or negative counts, bad timestamps).
    #[error("invalid response: {0}")]
    Validation(String),

    #[error("a synchronization is already in progress")]
    SyncInProgress,

    #[error("request cancelled")]
    Cancelled,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("no session token available")]
    MissingSessionToken,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl MonitorError {
    /// Short title used when the error is shown to the user.
    pub fn title(&self) -> &'static str {
        match self {
            MonitorError::Connection(_) => "Satu Sehat unreachable",
            MonitorError::Sync(_) => "Synchronization failed",
            MonitorError::Validation(_) => "Invalid status data",
            MonitorError::SyncInProgress => "Synchronization in progress",
            MonitorError::Cancelled => "Cancelled",
            MonitorError::Config(_) | MonitorError::MissingSessionToken => "Configuration error",
            MonitorError::Io(_) | MonitorError::Http(_) => "Unexpected error",
        }
    }
}
