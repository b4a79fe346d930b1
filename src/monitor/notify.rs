//! User-facing notifications, delivered over a channel to a single renderer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::warn;

use crate::types::MonitorError;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Serialize, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

pub type NotificationSender = Sender<Notification>;
pub type NotificationReceiver = Receiver<Notification>;

/// Creates a notifier and the receiving end for the renderer.
pub fn channel(capacity: usize) -> (Notifier, NotificationReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (Notifier { tx }, rx)
}

#[derive(Clone)]
pub struct Notifier {
    tx: NotificationSender,
}

impl Notifier {
    pub async fn publish(&self, level: NotificationLevel, title: &str, message: &str) {
        let notification = Notification {
            level,
            title: title.to_string(),
            message: message.to_string(),
            at: Utc::now(),
        };
        if self.tx.send(notification).await.is_err() {
            warn!(%title, body = %message, "Notification renderer is gone, notification dropped");
        }
    }

    pub async fn success(&self, title: &str, message: &str) {
        self.publish(NotificationLevel::Success, title, message).await;
    }

    pub async fn warning(&self, title: &str, message: &str) {
        self.publish(NotificationLevel::Warning, title, message).await;
    }

    pub async fn error(&self, err: &MonitorError) {
        self.publish(NotificationLevel::Error, err.title(), &err.to_string())
            .await;
    }
}
