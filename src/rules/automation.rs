//! Click automation and collaborator error recovery.
//!
//! Both are driven by facts: `user-intent` maps an inferred intent to a
//! confidence and a list of automated steps, and `error-patterns` maps an
//! error class to a retry budget and a fallback.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::builtin::fact_list;
use crate::context::ContextSnapshot;
use crate::facts::{FactStore, COURSE_CATALOG, ERROR_PATTERNS, USER_INTENT};
use crate::kernel::action::{Action, ActionResult, Course, Priority};

/// Intents at or below this confidence are never automated.
pub const AUTOMATION_CONFIDENCE: f64 = 0.7;

/// Maps a clicked element's action name to the intent behind it.
pub fn infer_intent(click: &str) -> Option<&'static str> {
    match click {
        "click-apply" => Some("apply-job"),
        "click-post-job" => Some("post-job"),
        "click-buy" => Some("buy-solution"),
        "visit-learn" => Some("learn-skill"),
        "view-profile" => Some("network"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IntentKnowledge {
    pub confidence: f64,
    #[serde(default)]
    pub actions: Vec<String>,
}

pub fn intent_knowledge(facts: &FactStore, intent: &str) -> Option<IntentKnowledge> {
    let entry = facts.get(USER_INTENT)?.get(intent)?.clone();
    serde_json::from_value(entry).ok()
}

/// Actions to run for a click. Empty for unknown clicks and for intents that
/// do not clear the confidence gate. Steps with nothing to act on are skipped.
pub fn automated_actions(click: &str, ctx: &ContextSnapshot) -> Vec<ActionResult> {
    let Some(intent) = infer_intent(click) else {
        return Vec::new();
    };
    let Some(knowledge) = intent_knowledge(&ctx.facts, intent) else {
        return Vec::new();
    };
    if knowledge.confidence <= AUTOMATION_CONFIDENCE {
        debug!(intent, confidence = knowledge.confidence, "intent below automation threshold");
        return Vec::new();
    }

    knowledge
        .actions
        .iter()
        .filter_map(|step| automated_step(step, ctx))
        .collect()
}

fn automated_step(step: &str, ctx: &ContextSnapshot) -> Option<ActionResult> {
    let user = ctx.user.as_ref();
    let result = match step {
        "connect-wallet" => ActionResult::new(Action::ConnectWallet, Priority::HIGH),
        "suggest-similar-jobs" => {
            let category = user?.skill_list().into_iter().next()?;
            ActionResult::new(Action::SuggestSimilarJobs { category }, Priority::LOW)
        }
        "recommend-courses" => {
            let courses: Vec<Course> = fact_list(&ctx.facts, COURSE_CATALOG);
            if courses.is_empty() {
                return None;
            }
            ActionResult::new(Action::ShowRecommendations { courses }, Priority::MEDIUM)
        }
        "suggest-connections" => {
            let user = user?;
            ActionResult::new(
                Action::SuggestConnections {
                    email: user.email.clone()?,
                    user_type: user.user_type.clone(),
                },
                Priority::LOW,
            )
        }
        other => {
            debug!(step = other, "no automation for step");
            return None;
        }
    };
    Some(result)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    WalletConnection,
    ApiFailure,
    FormValidation,
    Unknown,
}

impl ErrorClass {
    pub fn key(self) -> &'static str {
        match self {
            Self::WalletConnection => "wallet-connection",
            Self::ApiFailure => "api-failure",
            Self::FormValidation => "form-validation",
            Self::Unknown => "unknown",
        }
    }
}

pub fn classify_error(message: &str) -> ErrorClass {
    let message = message.to_lowercase();
    if message.contains("wallet") {
        ErrorClass::WalletConnection
    } else if message.contains("network") || message.contains("fetch") {
        ErrorClass::ApiFailure
    } else if message.contains("validation") {
        ErrorClass::FormValidation
    } else {
        ErrorClass::Unknown
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecoveryPattern {
    #[serde(default)]
    pub retry: u32,
    #[serde(default)]
    pub fallback: Option<String>,
}

/// Recovery table read from the `error-patterns` fact.
#[derive(Debug, Clone, Default)]
pub struct ErrorPatterns {
    patterns: HashMap<String, RecoveryPattern>,
}

impl ErrorPatterns {
    /// Malformed entries are ignored.
    pub fn from_facts(facts: &FactStore) -> Self {
        let patterns = match facts.get(ERROR_PATTERNS) {
            Some(Value::Object(entries)) => entries
                .iter()
                .filter_map(|(class, v)| {
                    let pattern: RecoveryPattern = serde_json::from_value(v.clone()).ok()?;
                    Some((class.clone(), pattern))
                })
                .collect(),
            _ => HashMap::new(),
        };
        Self { patterns }
    }

    pub fn lookup(&self, class: ErrorClass) -> Option<&RecoveryPattern> {
        self.patterns.get(class.key())
    }

    /// Extra attempts allowed after a failure with this message.
    pub fn retries_for(&self, message: &str) -> u32 {
        self.lookup(classify_error(message)).map_or(0, |p| p.retry)
    }

    pub fn fallback_for(&self, message: &str) -> Option<&str> {
        self.lookup(classify_error(message))?.fallback.as_deref()
    }
}
