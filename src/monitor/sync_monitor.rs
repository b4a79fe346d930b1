use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::satusehat_client::{
    AggregateSummary, SessionContext, StatusView, SyncBackend, SyncReport, SyncResult,
};
use crate::types::MonitorError;

use super::notify::Notifier;
use super::trigger::TriggerPhase;

/// What became of a status report that was fetched successfully.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// The report is now what the view displays.
    Applied(SyncReport),
    /// A newer request had already been applied, so the view kept its report.
    Discarded(SyncReport),
}

impl RefreshOutcome {
    pub fn report(&self) -> &SyncReport {
        match self {
            RefreshOutcome::Applied(report) | RefreshOutcome::Discarded(report) => report,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, RefreshOutcome::Applied(_))
    }
}

#[derive(Default)]
struct DisplayState {
    report: Option<SyncReport>,
    /// Issuance number of the newest request whose outcome is on screen.
    applied_seq: u64,
    /// Never decreases.
    last_sync: Option<DateTime<Utc>>,
    last_result: Option<SyncResult>,
}

/// Status provider and sync trigger for one client session.
///
/// Responses are applied in request issuance order: a response to an older
/// request never replaces what a newer one already put on screen.
pub struct SyncMonitor<B> {
    backend: B,
    session: SessionContext,
    notifier: Notifier,
    refresh_after_sync: bool,
    state: Mutex<DisplayState>,
    phase: StdMutex<TriggerPhase>,
    issued: AtomicU64,
    detach_tx: watch::Sender<bool>,
}

impl<B: SyncBackend> SyncMonitor<B> {
    pub fn new(backend: B, session: SessionContext, notifier: Notifier) -> Self {
        let (detach_tx, _) = watch::channel(false);
        Self {
            backend,
            session,
            notifier,
            refresh_after_sync: true,
            state: Mutex::new(DisplayState::default()),
            phase: StdMutex::new(TriggerPhase::Idle),
            issued: AtomicU64::new(0),
            detach_tx,
        }
    }

    pub fn with_refresh_after_sync(mut self, enabled: bool) -> Self {
        self.refresh_after_sync = enabled;
        self
    }

    /// Fetch the current report and show it if no newer request has been
    /// applied in the meantime. On failure the previous view stays as it was
    /// and one error notification is published.
    pub async fn refresh(&self) -> Result<RefreshOutcome, MonitorError> {
        let outcome = self.fetch_and_apply().await;
        if let Err(err) = &outcome {
            if !matches!(err, MonitorError::Cancelled) {
                self.notifier.error(err).await;
            }
        }
        outcome
    }

    async fn fetch_and_apply(&self) -> Result<RefreshOutcome, MonitorError> {
        let seq = self.next_seq();
        debug!(seq, "Refreshing sync status");

        match self.observe(self.backend.fetch_status(&self.session)).await {
            Ok(report) => {
                if self.apply_report(seq, report.clone()).await {
                    Ok(RefreshOutcome::Applied(report))
                } else {
                    Ok(RefreshOutcome::Discarded(report))
                }
            }
            Err(MonitorError::Cancelled) => {
                debug!(seq, "Status refresh abandoned after detach");
                Err(MonitorError::Cancelled)
            }
            Err(err) => {
                warn!(seq, error = ?err, "Status refresh failed, keeping last known report");
                Err(err)
            }
        }
    }

    /// Request a manual synchronization. Only one may be in flight; a second
    /// call while one is pending is rejected without reaching the server.
    ///
    /// Publishes exactly one notification. Dropping the returned future before
    /// it completes puts the trigger back to `Idle`.
    pub async fn trigger_sync(&self) -> Result<SyncResult, MonitorError> {
        let pending = match PendingSync::begin(&self.phase) {
            Ok(pending) => pending,
            Err(err) => {
                warn!("Sync requested while another is pending");
                self.notifier
                    .warning(err.title(), "Wait for the running synchronization to finish")
                    .await;
                return Err(err);
            }
        };

        let seq = self.next_seq();
        let invoked_at = Utc::now();
        info!(seq, "Triggering Satu Sehat synchronization");

        let outcome = self
            .observe(self.backend.trigger_sync(&self.session))
            .await
            .map(|mut result| {
                if result.completed_at < invoked_at {
                    result.completed_at = invoked_at;
                }
                result
            });

        match &outcome {
            Ok(result) => {
                self.record_success(seq, result).await;
                self.notifier.success("Synchronization complete", &result.message).await;
            }
            Err(MonitorError::Cancelled) => {
                debug!(seq, "Sync observation abandoned after detach");
            }
            Err(err) => {
                warn!(seq, error = ?err, "Synchronization failed");
                self.state.lock().await.last_result =
                    Some(SyncResult::failed(err.to_string(), Utc::now()));
                self.notifier.error(err).await;
            }
        }

        pending.finish(outcome.is_ok());

        if outcome.is_ok() && self.refresh_after_sync && !self.is_detached() {
            // The sync already announced itself, so this one stays quiet
            if let Err(err) = self.fetch_and_apply().await {
                warn!(error = ?err, "Status refresh after sync failed");
            }
        }

        outcome
    }

    /// What the status view should display right now.
    pub async fn snapshot(&self) -> StatusView {
        let state = self.state.lock().await;
        match &state.report {
            None => StatusView::Unknown,
            Some(report) => StatusView::Available(SyncReport {
                last_sync: state.last_sync,
                ..report.clone()
            }),
        }
    }

    pub async fn summary(&self) -> AggregateSummary {
        self.snapshot().await.report_or_zeroed().summary()
    }

    pub async fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.last_sync
    }

    pub async fn last_result(&self) -> Option<SyncResult> {
        self.state.lock().await.last_result.clone()
    }

    pub fn trigger_phase(&self) -> TriggerPhase {
        *lock_phase(&self.phase)
    }

    /// The view went away: pending observations resolve to `Cancelled` and
    /// nothing further is applied or announced.
    pub fn detach(&self) {
        self.detach_tx.send_replace(true);
    }

    pub fn is_detached(&self) -> bool {
        *self.detach_tx.borrow()
    }

    /// Refresh every `interval` until detached.
    pub fn spawn_polling(self: Arc<Self>, interval: Duration) -> JoinHandle<()>
    where
        B: 'static,
    {
        tokio::spawn(async move {
            let mut detached = self.detach_tx.subscribe();
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            while !self.is_detached() {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(err) = self.refresh().await {
                            debug!(error = ?err, "Poll tick did not update the view");
                        }
                    }
                    _ = wait_detached(&mut detached) => break,
                }
            }
            debug!("Status polling stopped");
        })
    }

    fn next_seq(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn observe<T, F>(&self, request: F) -> Result<T, MonitorError>
    where
        F: Future<Output = Result<T, MonitorError>>,
    {
        let mut detached = self.detach_tx.subscribe();
        let already_detached = *detached.borrow_and_update();
        if already_detached {
            return Err(MonitorError::Cancelled);
        }

        tokio::select! {
            result = request => {
                if self.is_detached() {
                    Err(MonitorError::Cancelled)
                } else {
                    result
                }
            }
            _ = wait_detached(&mut detached) => Err(MonitorError::Cancelled),
        }
    }

    async fn apply_report(&self, seq: u64, report: SyncReport) -> bool {
        let mut state = self.state.lock().await;
        if self.is_detached() {
            return false;
        }
        if seq <= state.applied_seq {
            debug!(
                seq,
                applied = state.applied_seq,
                "Discarding status response older than what is displayed"
            );
            return false;
        }

        state.applied_seq = seq;
        state.last_sync = state.last_sync.max(report.last_sync);
        state.report = Some(report);
        true
    }

    async fn record_success(&self, seq: u64, result: &SyncResult) {
        let mut state = self.state.lock().await;
        state.last_result = Some(result.clone());
        if self.is_detached() {
            return;
        }
        // Status requests issued before this sync now describe stale data
        state.applied_seq = state.applied_seq.max(seq);
        state.last_sync = state.last_sync.max(Some(result.completed_at));
    }
}

fn lock_phase(phase: &StdMutex<TriggerPhase>) -> MutexGuard<'_, TriggerPhase> {
    phase.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the trigger in `Pending` for one admitted sync and settles it back
/// to `Idle` on drop, also when the owning future is dropped mid-request.
struct PendingSync<'a> {
    phase: &'a StdMutex<TriggerPhase>,
    succeeded: Option<bool>,
}

impl<'a> PendingSync<'a> {
    fn begin(phase: &'a StdMutex<TriggerPhase>) -> Result<Self, MonitorError> {
        lock_phase(phase).begin()?;
        Ok(Self {
            phase,
            succeeded: None,
        })
    }

    fn finish(mut self, succeeded: bool) {
        self.succeeded = Some(succeeded);
    }
}

impl Drop for PendingSync<'_> {
    fn drop(&mut self) {
        let mut phase = lock_phase(self.phase);
        let Some(succeeded) = self.succeeded else {
            debug!("Sync dropped before completion, trigger is idle again");
            *phase = TriggerPhase::Idle;
            return;
        };
        let settled = phase
            .complete(succeeded)
            .and_then(|_| phase.consume().map(|_| ()));
        if let Err(err) = settled {
            warn!(error = %err, "Unexpected sync phase, resetting to idle");
            *phase = TriggerPhase::Idle;
        }
    }
}

async fn wait_detached(detached: &mut watch::Receiver<bool>) {
    // The sender lives as long as the monitor, so this only returns on detach
    let _ = detached.wait_for(|gone| *gone).await;
}
