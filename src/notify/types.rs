use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type NotificationId = Uuid;

pub const MAX_PRIORITY: u8 = 5;
const CRITICAL_BOOST: u8 = 2;
const HIGH_PRIORITY_EXTENSION: Duration = Duration::from_millis(2_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn base_priority(self) -> u8 {
        match self {
            Self::Success => 1,
            Self::Info => 2,
            Self::Warning => 3,
            Self::Error => 4,
        }
    }

    pub fn base_duration(self) -> Duration {
        match self {
            Self::Success => Duration::from_millis(3_000),
            Self::Info => Duration::from_millis(4_000),
            Self::Warning => Duration::from_millis(6_000),
            Self::Error => Duration::from_millis(8_000),
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "check-circle",
            Self::Info => "info-circle",
            Self::Warning => "exclamation-triangle",
            Self::Error => "exclamation-circle",
        }
    }
}

/// Kind priority plus the critical boost, capped at 5.
pub fn notification_priority(kind: NotificationKind, critical: bool) -> u8 {
    let boost = if critical { CRITICAL_BOOST } else { 0 };
    (kind.base_priority() + boost).min(MAX_PRIORITY)
}

/// Visible time of a toast. Priorities above 3 stay 2s longer.
pub fn display_duration(kind: NotificationKind, priority: u8) -> Duration {
    let base = kind.base_duration();
    if priority > 3 {
        base + HIGH_PRIORITY_EXTENSION
    } else {
        base
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    pub priority: u8,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind, critical: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            timestamp: Utc::now(),
            priority: notification_priority(kind, critical),
        }
    }

    pub fn display_duration(&self) -> Duration {
        display_duration(self.kind, self.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_boost_is_capped() {
        assert_eq!(notification_priority(NotificationKind::Success, false), 1);
        assert_eq!(notification_priority(NotificationKind::Info, true), 4);
        assert_eq!(notification_priority(NotificationKind::Warning, true), 5);
        assert_eq!(notification_priority(NotificationKind::Error, true), 5);
    }

    #[test]
    fn duration_mapping() {
        assert_eq!(display_duration(NotificationKind::Error, 4), Duration::from_millis(10_000));
        assert_eq!(display_duration(NotificationKind::Success, 1), Duration::from_millis(3_000));
        assert_eq!(display_duration(NotificationKind::Warning, 3), Duration::from_millis(6_000));
        assert_eq!(display_duration(NotificationKind::Info, 4), Duration::from_millis(6_000));
    }
}
