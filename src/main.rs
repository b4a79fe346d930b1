use std::env;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use satusehat_sync_monitor::monitor::{self, NotificationReceiver};
use satusehat_sync_monitor::satusehat_client::helpers::format_relative_time;
use satusehat_sync_monitor::satusehat_client::DEFAULT_ATTENTION_THRESHOLD;
use satusehat_sync_monitor::{
    AggregateSummary, Config, MonitorError, NotificationLevel, SatuSehatClient, SessionContext,
    StatusView, SyncMonitor,
};

const NOTIFICATION_CAPACITY: usize = 32;

#[derive(Serialize)]
struct StatusOutput {
    view: StatusView,
    summary: AggregateSummary,
    needs_attention: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_sync_relative: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run().await {
        error!(error = %err, "satusehat-sync-monitor exited with an error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), MonitorError> {
    let command = env::args().nth(1).unwrap_or_else(|| "status".to_string());
    let config = Config::load().await;
    let session = SessionContext::from_config(&config).await?;
    let client = SatuSehatClient::new(&config)?;
    info!(api = %client.base_url(), command = %command, "Starting Satu Sehat sync monitor");

    let (notifier, notifications) = monitor::channel(NOTIFICATION_CAPACITY);
    let renderer = spawn_renderer(notifications);
    let monitor = Arc::new(
        SyncMonitor::new(client, session, notifier)
            .with_refresh_after_sync(config.refresh_after_sync),
    );

    let outcome = match command.as_str() {
        "status" => monitor.refresh().await.map(|_| ()),
        "sync" => monitor.trigger_sync().await.map(|_| ()),
        "watch" => {
            let poller = Arc::clone(&monitor).spawn_polling(config.poll_interval());
            tokio::signal::ctrl_c().await?;
            monitor.detach();
            if let Err(err) = poller.await {
                warn!(error = ?err, "Polling task ended abnormally");
            }
            Ok(())
        }
        other => Err(MonitorError::Config(format!(
            "unknown command `{other}` (expected status, sync or watch)"
        ))),
    };

    print_status(&monitor).await?;

    // Dropping the monitor closes the channel so the renderer can drain and stop
    drop(monitor);
    if let Err(err) = renderer.await {
        warn!(error = ?err, "Notification renderer ended abnormally");
    }
    outcome
}

async fn print_status(monitor: &SyncMonitor<SatuSehatClient>) -> Result<(), MonitorError> {
    let view = monitor.snapshot().await;
    let summary = view.report_or_zeroed().summary();
    let output = StatusOutput {
        needs_attention: !view.is_unknown() && summary.needs_attention(DEFAULT_ATTENTION_THRESHOLD),
        last_sync_relative: monitor
            .last_sync()
            .await
            .map(|when| format_relative_time(when, Utc::now())),
        view,
        summary,
    };
    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|err| MonitorError::Config(format!("Failed to render status: {err}")))?;
    println!("{rendered}");
    Ok(())
}

/// Single consumer of user notifications.
fn spawn_renderer(mut notifications: NotificationReceiver) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            match notification.level {
                NotificationLevel::Success => {
                    info!(title = %notification.title, "{}", notification.message)
                }
                NotificationLevel::Warning => {
                    warn!(title = %notification.title, "{}", notification.message)
                }
                NotificationLevel::Error => {
                    error!(title = %notification.title, "{}", notification.message)
                }
            }
        }
    })
}
