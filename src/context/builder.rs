use chrono::Utc;
use serde_json::Value;

use super::activity::ActivityTracker;
use super::kv::KvStore;
use super::types::{ContextSnapshot, UserProfile};
use crate::facts::{FactStore, PLATFORM_STATE};

pub const CURRENT_USER_KEY: &str = "current_user";

/// Reads the stored profile. Absent or unparseable records are `None`.
pub fn current_user(store: &dyn KvStore) -> Option<UserProfile> {
    let raw = store.get(CURRENT_USER_KEY)?;
    serde_json::from_str(&raw).ok()
}

/// Pure read of page, profile, clock, facts and counters.
/// Never fails.
pub fn build_context(
    page: &str,
    store: &dyn KvStore,
    activity: &ActivityTracker,
    facts: &FactStore,
) -> ContextSnapshot {
    ContextSnapshot {
        page: page.to_string(),
        user: current_user(store),
        timestamp: Utc::now(),
        platform_state: facts.get(PLATFORM_STATE).cloned().unwrap_or(Value::Null),
        user_activity: activity.counters(),
        facts: facts.clone(),
    }
}
