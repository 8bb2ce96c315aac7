use serde::{Deserialize, Serialize};

use crate::kernel::dispatcher::CallKind;
use crate::kernel::time::Round;
use crate::notify::NotificationId;

// Allowed: IDs, counts, rule names, enums.
// Forbidden: notification text, profile fields, payloads.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TelemetryEvent {
    RoundCompleted {
        round: Round,
        evaluated: usize,
        failed: usize,
        dispatched: usize,
    },

    RuleFailed {
        round: Round,
        rule: String,
    },

    NotificationLifecycle {
        id: Option<NotificationId>,
        event: NotificationEventKind,
    },

    Collaborator {
        call: CallKind,
        outcome: CallOutcome,
    },

    Lifecycle(LifecycleEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationEventKind {
    Queued,
    Rejected,
    Shown,
    Expired,
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallOutcome {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Started,
    Stopped,
}
