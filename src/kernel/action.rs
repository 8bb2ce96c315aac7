use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HeraldError, Result};
use crate::notify::NotificationKind;

/// Rule urgency, clamped to 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(u8);

impl Priority {
    pub const LOW: Priority = Priority(1);
    pub const MEDIUM: Priority = Priority(3);
    pub const HIGH: Priority = Priority(5);

    pub fn new(value: u8) -> Self {
        Priority(value.clamp(1, 5))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestorMatch {
    pub name: String,
    pub sector: String,
    #[serde(default)]
    pub stage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationSuggestion {
    pub goal: String,
    pub target: String,
}

/// Closed set of actions a rule may recommend.
///
/// Adding a variant forces every `match` in the dispatcher to handle it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "kebab-case")]
pub enum Action {
    PromptWalletConnection,
    ConnectWallet,
    InsufficientFunds,
    SuggestSkillImprovement { match_score: f64 },
    ShowRecommendations { courses: Vec<Course> },
    BoostEngagement { suggestions: Vec<String> },
    LeadershipOpportunity,
    MaintainEngagement,
    ShowMatches { matches: Vec<InvestorMatch> },
    SuggestNavigation(NavigationSuggestion),
    SuggestProgram { level: String },
    SuggestSimilarJobs { category: String },
    SuggestConnections { email: String, user_type: Option<String> },
    Notify {
        message: String,
        kind: NotificationKind,
        #[serde(default)]
        critical: bool,
    },
}

impl Action {
    pub const TAGS: &'static [&'static str] = &[
        "prompt-wallet-connection",
        "connect-wallet",
        "insufficient-funds",
        "suggest-skill-improvement",
        "show-recommendations",
        "boost-engagement",
        "leadership-opportunity",
        "maintain-engagement",
        "show-matches",
        "suggest-navigation",
        "suggest-program",
        "suggest-similar-jobs",
        "suggest-connections",
        "notify",
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::PromptWalletConnection => "prompt-wallet-connection",
            Self::ConnectWallet => "connect-wallet",
            Self::InsufficientFunds => "insufficient-funds",
            Self::SuggestSkillImprovement { .. } => "suggest-skill-improvement",
            Self::ShowRecommendations { .. } => "show-recommendations",
            Self::BoostEngagement { .. } => "boost-engagement",
            Self::LeadershipOpportunity => "leadership-opportunity",
            Self::MaintainEngagement => "maintain-engagement",
            Self::ShowMatches { .. } => "show-matches",
            Self::SuggestNavigation(_) => "suggest-navigation",
            Self::SuggestProgram { .. } => "suggest-program",
            Self::SuggestSimilarJobs { .. } => "suggest-similar-jobs",
            Self::SuggestConnections { .. } => "suggest-connections",
            Self::Notify { .. } => "notify",
        }
    }
}

/// Output of a rule: what to do and how urgent it is.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult {
    pub action: Action,
    pub priority: Priority,
}

impl ActionResult {
    pub fn new(action: Action, priority: Priority) -> Self {
        Self { action, priority }
    }

    /// Parses `{ "action": tag, "priority": n, "payload": ... }`.
    ///
    /// Unknown tags are an error rather than a silent no-op. A missing or
    /// non-numeric priority defaults to low.
    pub fn from_json(value: &Value) -> Result<Self> {
        let tag = value
            .get("action")
            .and_then(Value::as_str)
            .ok_or_else(|| HeraldError::UnknownAction {
                tag: String::new(),
            })?;

        if !Action::TAGS.contains(&tag) {
            return Err(HeraldError::UnknownAction {
                tag: tag.to_string(),
            });
        }

        let mut tagged = serde_json::Map::new();
        tagged.insert("action".into(), Value::String(tag.to_string()));
        if let Some(payload) = value.get("payload") {
            tagged.insert("payload".into(), payload.clone());
        }
        let action: Action = serde_json::from_value(Value::Object(tagged))?;

        let priority = value
            .get("priority")
            .and_then(Value::as_u64)
            .map(|p| Priority::new(p.min(u8::MAX as u64) as u8))
            .unwrap_or(Priority::LOW);

        Ok(Self { action, priority })
    }
}
