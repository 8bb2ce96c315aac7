use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::facts::FactStore;

/// Stored profile of the signed-in user. Every field is optional and loosely
/// typed: a field of the wrong type reads as absent instead of discarding the
/// whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub user_type: Option<String>,
    /// Comma separated skill list. A JSON array is joined on read.
    #[serde(deserialize_with = "lenient_skills")]
    pub skills: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub experience_level: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub sector: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub stage: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub wallet_connected: bool,
    /// Number or numeric string.
    #[serde(deserialize_with = "lenient_number")]
    pub balance: Option<f64>,
}

impl UserProfile {
    pub fn skill_list(&self) -> Vec<String> {
        self.skills
            .as_deref()
            .map(|s| {
                s.split(',')
                    .map(|skill| skill.trim().to_string())
                    .filter(|skill| !skill.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_skills<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Array(items) => {
            let skills: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            Some(skills.join(", "))
        }
        _ => None,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok().filter(|v: &f64| v.is_finite()),
        _ => None,
    })
}

/// Interaction counters persisted across sessions. Never decremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivityCounters {
    pub page_views: u64,
    #[serde(rename = "timeSpent")]
    pub time_spent_seconds: u64,
    pub interactions: u64,
    pub contributions: u64,
}

/// Input of one inference round. Built fresh, discarded after the round.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSnapshot {
    pub page: String,
    pub user: Option<UserProfile>,
    pub timestamp: DateTime<Utc>,
    pub platform_state: Value,
    pub user_activity: ActivityCounters,
    /// Fact base as of this round, so rules see the latest `update_fact`.
    #[serde(skip)]
    pub facts: FactStore,
}

impl ContextSnapshot {
    /// Bare snapshot for a page with no user and zeroed counters.
    pub fn for_page(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            user: None,
            timestamp: Utc::now(),
            platform_state: Value::Null,
            user_activity: ActivityCounters::default(),
            facts: FactStore::new(),
        }
    }

    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_activity(mut self, activity: ActivityCounters) -> Self {
        self.user_activity = activity;
        self
    }

    pub fn with_facts(mut self, facts: FactStore) -> Self {
        self.facts = facts;
        self
    }
}
