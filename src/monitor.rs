pub mod notify;
mod sync_monitor;
pub mod trigger;

pub use notify::{channel, Notification, NotificationLevel, NotificationReceiver, Notifier};
pub use sync_monitor::{RefreshOutcome, SyncMonitor};
pub use trigger::TriggerPhase;
