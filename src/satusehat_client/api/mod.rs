mod types;

pub const STATUS_PATH: &str = "/sync/status";
pub const TRIGGER_PATH: &str = "/sync/trigger";

pub use types::{ConnectionBlock, CountsBlock, ErrorEnvelope, StatusResponse, TriggerResponse};
