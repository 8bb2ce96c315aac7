use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;
use tracing::info;

use super::queue::DismissReason;
use super::types::{Notification, NotificationId};

/// Rendering seam. Accepts a notification and removes it on request.
pub trait ToastSurface: Send + Sync {
    fn show(&self, notification: &Notification, duration: Duration);
    fn hide(&self, id: NotificationId, reason: DismissReason);
}

/// Writes toasts to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSurface;

impl ToastSurface for TracingSurface {
    fn show(&self, notification: &Notification, duration: Duration) {
        info!(
            id = %notification.id,
            kind = ?notification.kind,
            priority = notification.priority,
            icon = notification.kind.icon(),
            "[TOAST {}ms] {}",
            duration.as_millis(),
            notification.message
        );
    }

    fn hide(&self, id: NotificationId, reason: DismissReason) {
        info!(id = %id, ?reason, "[TOAST] dismissed");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Shown(Notification),
    Hidden(NotificationId, DismissReason),
}

/// Keeps every call with the instant it happened. Clones share the log.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    log: Arc<Mutex<Vec<(Instant, SurfaceEvent)>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(Instant, SurfaceEvent)> {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn shown(&self) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter_map(|(_, e)| match e {
                SurfaceEvent::Shown(n) => Some(n),
                SurfaceEvent::Hidden(..) => None,
            })
            .collect()
    }

    fn push(&self, event: SurfaceEvent) {
        self.log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((Instant::now(), event));
    }
}

impl ToastSurface for RecordingSurface {
    fn show(&self, notification: &Notification, _duration: Duration) {
        self.push(SurfaceEvent::Shown(notification.clone()));
    }

    fn hide(&self, id: NotificationId, reason: DismissReason) {
        self.push(SurfaceEvent::Hidden(id, reason));
    }
}
