use tracing::warn;

use super::kv::KvStore;
use super::types::ActivityCounters;

pub const USER_ACTIVITY_KEY: &str = "user_activity";

/// Interaction observed on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEvent {
    PageView(String),
    Interaction,
    /// Interaction on an element carrying an action name, e.g. `click-buy`.
    Click(String),
    Contribution,
    TimeSpent(u64),
}

/// In-memory counters mirrored to durable storage after each update.
#[derive(Debug, Default)]
pub struct ActivityTracker {
    counters: ActivityCounters,
}

impl ActivityTracker {
    /// Loads persisted counters. Missing or malformed records start from zero.
    pub fn load(store: &dyn KvStore) -> Self {
        let counters = store
            .get(USER_ACTIVITY_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self { counters }
    }

    pub fn counters(&self) -> ActivityCounters {
        self.counters
    }

    /// Applies one event. Counters saturate instead of wrapping.
    pub fn record(&mut self, event: &ActivityEvent, store: &mut dyn KvStore) {
        let c = &mut self.counters;
        match event {
            ActivityEvent::PageView(_) => c.page_views = c.page_views.saturating_add(1),
            ActivityEvent::Interaction | ActivityEvent::Click(_) => {
                c.interactions = c.interactions.saturating_add(1)
            }
            ActivityEvent::Contribution => c.contributions = c.contributions.saturating_add(1),
            ActivityEvent::TimeSpent(secs) => {
                c.time_spent_seconds = c.time_spent_seconds.saturating_add(*secs)
            }
        }
        self.persist(store);
    }

    fn persist(&self, store: &mut dyn KvStore) {
        let encoded = match serde_json::to_string(&self.counters) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Failed to encode activity counters: {}", e);
                return;
            }
        };
        // Memory stays authoritative if the write fails.
        if let Err(e) = store.set(USER_ACTIVITY_KEY, encoded) {
            warn!("Failed to persist activity counters: {}", e);
        }
    }
}
