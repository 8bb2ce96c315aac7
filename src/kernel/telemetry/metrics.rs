use std::collections::VecDeque;

use super::event::{CallOutcome, LifecycleEvent, NotificationEventKind, TelemetryEvent};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub round_stats: RoundStats,
    pub notification_stats: NotificationStats,
    pub collaborator_stats: CollaboratorStats,
    pub starts: u64,
    pub stops: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundStats {
    pub rounds: u64,
    pub rules_evaluated: u64,
    pub rule_failures: u64,
    pub actions_dispatched: u64,
    pub avg_actions_per_round: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationStats {
    pub queued: u64,
    pub rejected: u64,
    pub shown: u64,
    pub expired: u64,
    pub dismissed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollaboratorStats {
    pub succeeded: u64,
    pub failed: u64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::RoundCompleted {
                evaluated,
                dispatched,
                ..
            } => {
                snap.round_stats.rounds += 1;
                snap.round_stats.rules_evaluated += *evaluated as u64;
                snap.round_stats.actions_dispatched += *dispatched as u64;
            }
            TelemetryEvent::RuleFailed { .. } => snap.round_stats.rule_failures += 1,
            TelemetryEvent::NotificationLifecycle { event, .. } => {
                let n = &mut snap.notification_stats;
                match event {
                    NotificationEventKind::Queued => n.queued += 1,
                    NotificationEventKind::Rejected => n.rejected += 1,
                    NotificationEventKind::Shown => n.shown += 1,
                    NotificationEventKind::Expired => n.expired += 1,
                    NotificationEventKind::Dismissed => n.dismissed += 1,
                }
            }
            TelemetryEvent::Collaborator { outcome, .. } => match outcome {
                CallOutcome::Succeeded => snap.collaborator_stats.succeeded += 1,
                CallOutcome::Failed => snap.collaborator_stats.failed += 1,
            },
            TelemetryEvent::Lifecycle(LifecycleEvent::Started) => snap.starts += 1,
            TelemetryEvent::Lifecycle(LifecycleEvent::Stopped) => snap.stops += 1,
        }
    }

    if snap.round_stats.rounds > 0 {
        snap.round_stats.avg_actions_per_round =
            snap.round_stats.actions_dispatched as f64 / snap.round_stats.rounds as f64;
    }

    snap
}
