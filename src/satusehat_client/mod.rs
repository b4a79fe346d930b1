pub mod api;
mod client;
pub mod core;
pub mod helpers;
pub mod models;

pub use client::{SatuSehatClient, SyncBackend};
pub use self::core::aggregator::{aggregate, AggregateSummary, DEFAULT_ATTENTION_THRESHOLD};
pub use models::{
    ConnectionState, ConnectionStatus, SessionContext, StatusView, SyncCategory, SyncReport,
    SyncResult,
};
