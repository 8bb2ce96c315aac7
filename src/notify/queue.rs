use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;
use thiserror::Error;
use tracing::debug;

use super::types::{Notification, NotificationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Expired,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    Empty,
    Displaying {
        id: NotificationId,
        shown_at: Instant,
        until: Instant,
    },
    CoolingDown {
        until: Instant,
    },
}

/// What the surface must do after a queue transition.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueEffect {
    Show {
        notification: Notification,
        duration: Duration,
    },
    Hide {
        id: NotificationId,
        reason: DismissReason,
    },
}

/// Rejected enqueue. `effects` are the transitions the preceding poll already
/// applied; the surface must still receive them.
#[derive(Debug, Clone, Error)]
#[error("notification queue full ({capacity} waiting)")]
pub struct QueueFull {
    pub capacity: usize,
    pub effects: Vec<QueueEffect>,
}

/// Serializes toasts: one visible at a time, FIFO, with a quiet gap after each.
///
/// The queue owns no timer. The driver calls `poll` at `next_deadline`, and
/// each deadline is derived from the previous scheduled instant, not from the
/// time `poll` happened to run.
#[derive(Debug)]
pub struct NotificationQueue {
    pending: VecDeque<Notification>,
    current: Option<Notification>,
    state: QueueState,
    cooldown: Duration,
    capacity: usize,
}

impl NotificationQueue {
    pub fn new(cooldown: Duration, capacity: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            current: None,
            state: QueueState::Empty,
            cooldown,
            capacity,
        }
    }

    pub fn state(&self) -> QueueState {
        self.state
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            QueueState::Empty => None,
            QueueState::Displaying { until, .. } | QueueState::CoolingDown { until } => Some(until),
        }
    }

    /// Appends to the back of the queue; shows immediately when the queue is empty.
    pub fn enqueue(
        &mut self,
        notification: Notification,
        now: Instant,
    ) -> Result<Vec<QueueEffect>, QueueFull> {
        let mut effects = self.poll(now);

        if self.pending.len() >= self.capacity {
            return Err(QueueFull {
                capacity: self.capacity,
                effects,
            });
        }

        debug!(id = %notification.id, priority = notification.priority, "notification queued");
        self.pending.push_back(notification);

        if self.state == QueueState::Empty {
            effects.extend(self.show_next(now));
        }
        Ok(effects)
    }

    /// Applies every transition whose deadline is at or before `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<QueueEffect> {
        let mut effects = Vec::new();

        loop {
            match self.state {
                QueueState::Displaying { id, until, .. } if until <= now => {
                    self.current = None;
                    self.state = QueueState::CoolingDown {
                        until: until + self.cooldown,
                    };
                    effects.push(QueueEffect::Hide {
                        id,
                        reason: DismissReason::Expired,
                    });
                }
                QueueState::CoolingDown { until } if until <= now => {
                    if self.pending.is_empty() {
                        self.state = QueueState::Empty;
                    } else {
                        effects.extend(self.show_next(until));
                    }
                }
                _ => break,
            }
        }

        effects
    }

    /// Manual close. Only the displayed notification can be dismissed; any
    /// other id, including one already dismissed, is a no-op.
    pub fn dismiss(&mut self, id: NotificationId, now: Instant) -> Vec<QueueEffect> {
        let mut effects = self.poll(now);

        if let QueueState::Displaying { id: shown, .. } = self.state {
            if shown == id {
                self.current = None;
                self.state = QueueState::CoolingDown {
                    until: now + self.cooldown,
                };
                effects.push(QueueEffect::Hide {
                    id,
                    reason: DismissReason::Manual,
                });
            }
        }

        effects
    }

    fn show_next(&mut self, start: Instant) -> Option<QueueEffect> {
        let notification = self.pending.pop_front()?;
        let duration = notification.display_duration();

        self.state = QueueState::Displaying {
            id: notification.id,
            shown_at: start,
            until: start + duration,
        };
        self.current = Some(notification.clone());

        Some(QueueEffect::Show {
            notification,
            duration,
        })
    }
}
