//! Satu Sehat synchronization monitor for the SIMRS front end.
//!
//! Fetches the per-category sync status from the SIMRS API, lets an operator
//! request a manual push to the national registry, and reports every outcome
//! through a notification channel.

pub mod config;
pub mod monitor;
pub mod satusehat_client;
pub mod types;

pub use config::Config;
pub use monitor::{
    Notification, NotificationLevel, Notifier, RefreshOutcome, SyncMonitor, TriggerPhase,
};
pub use satusehat_client::{
    aggregate, AggregateSummary, SatuSehatClient, SessionContext, StatusView, SyncBackend,
    SyncCategory, SyncReport, SyncResult,
};
pub use types::MonitorError;
