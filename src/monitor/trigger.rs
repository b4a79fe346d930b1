use serde::Serialize;
use thiserror::Error;

use crate::types::MonitorError;

/// Lifecycle of a manual sync request.
///
/// `Idle -> Pending -> {Succeeded, Failed} -> Idle`; there is no edge from
/// `Pending` back to `Pending`.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TriggerPhase {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot {action} while {from:?}")]
pub struct InvalidTransition {
    pub from: TriggerPhase,
    pub action: &'static str,
}

impl TriggerPhase {
    /// Enter `Pending`. Anything other than `Idle` means a sync is still
    /// being processed and the request is rejected.
    pub fn begin(&mut self) -> Result<(), MonitorError> {
        match self {
            TriggerPhase::Idle => {
                *self = TriggerPhase::Pending;
                Ok(())
            }
            _ => Err(MonitorError::SyncInProgress),
        }
    }

    pub fn complete(&mut self, succeeded: bool) -> Result<(), InvalidTransition> {
        match self {
            TriggerPhase::Pending => {
                *self = if succeeded {
                    TriggerPhase::Succeeded
                } else {
                    TriggerPhase::Failed
                };
                Ok(())
            }
            from => Err(InvalidTransition {
                from: *from,
                action: "complete",
            }),
        }
    }

    /// Result has been handed to the caller; back to `Idle`.
    pub fn consume(&mut self) -> Result<TriggerPhase, InvalidTransition> {
        match self {
            TriggerPhase::Succeeded | TriggerPhase::Failed => {
                let finished = *self;
                *self = TriggerPhase::Idle;
                Ok(finished)
            }
            from => Err(InvalidTransition {
                from: *from,
                action: "consume",
            }),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TriggerPhase::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle_returns_to_idle() {
        let mut phase = TriggerPhase::default();
        phase.begin().unwrap();
        assert!(phase.is_pending());
        phase.complete(true).unwrap();
        assert_eq!(phase, TriggerPhase::Succeeded);
        assert_eq!(phase.consume().unwrap(), TriggerPhase::Succeeded);
        assert_eq!(phase, TriggerPhase::Idle);
    }

    #[test]
    fn pending_cannot_begin_again() {
        let mut phase = TriggerPhase::Idle;
        phase.begin().unwrap();
        assert!(matches!(phase.begin(), Err(MonitorError::SyncInProgress)));
        assert_eq!(phase, TriggerPhase::Pending);
    }

    #[test]
    fn unconsumed_result_blocks_new_sync() {
        let mut phase = TriggerPhase::Idle;
        phase.begin().unwrap();
        phase.complete(false).unwrap();
        assert!(matches!(phase.begin(), Err(MonitorError::SyncInProgress)));
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        let mut phase = TriggerPhase::Idle;
        assert_eq!(
            phase.complete(true),
            Err(InvalidTransition {
                from: TriggerPhase::Idle,
                action: "complete"
            })
        );
        assert!(phase.consume().is_err());
        assert_eq!(phase, TriggerPhase::Idle);
    }
}
