use std::time::Duration;

use tracing::debug;

use super::action::{Action, ActionResult};
use crate::notify::NotificationKind;
use crate::rules::logic::program_for_level;
use crate::rules::ErrorPatterns;
use crate::services::{Collaborators, Connection, Job, JobFilters};

pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again later";
pub const MANUAL_WALLET_MESSAGE: &str =
    "Automatic wallet connection failed. Please connect your wallet manually";

const RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub message: String,
    pub kind: NotificationKind,
    pub critical: bool,
}

impl NotificationRequest {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
            critical: false,
        }
    }

    pub fn critical(mut self) -> Self {
        self.critical = true;
        self
    }
}

/// Fire-and-forget request to an external collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum CollaboratorCall {
    FindJobs(JobFilters),
    FindConnections {
        email: String,
        user_type: Option<String>,
    },
    ConnectWallet,
}

impl CollaboratorCall {
    pub fn kind(&self) -> CallKind {
        match self {
            Self::FindJobs(_) => CallKind::Jobs,
            Self::FindConnections { .. } => CallKind::Connections,
            Self::ConnectWallet => CallKind::Wallet,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CallKind {
    Jobs,
    Connections,
    Wallet,
}

/// Collaborator outcome, errors flattened to their message.
#[derive(Debug, Clone, PartialEq)]
pub enum CollaboratorReply {
    Jobs(Result<Vec<Job>, String>),
    Connections(Result<Vec<Connection>, String>),
    Wallet(Result<bool, String>),
}

impl CollaboratorReply {
    pub fn kind(&self) -> CallKind {
        match self {
            Self::Jobs(_) => CallKind::Jobs,
            Self::Connections(_) => CallKind::Connections,
            Self::Wallet(_) => CallKind::Wallet,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Jobs(Err(e)) | Self::Connections(Err(e)) | Self::Wallet(Err(e)) => Some(e),
            _ => None,
        }
    }
}

/// The single side effect chosen for an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Notify(NotificationRequest),
    Call(CollaboratorCall),
}

/// Maps action results to directives, and collaborator replies to toasts.
#[derive(Debug, Default)]
pub struct ActionDispatcher {
    suggestion_cursor: usize,
    notify_on_failure: bool,
}

impl ActionDispatcher {
    pub fn new(notify_on_failure: bool) -> Self {
        Self {
            suggestion_cursor: 0,
            notify_on_failure,
        }
    }

    /// Exhaustive over `Action`; `None` means the action has no visible effect.
    pub fn execute(&mut self, result: &ActionResult) -> Option<Directive> {
        use NotificationKind::*;

        let request = match &result.action {
            Action::PromptWalletConnection => {
                NotificationRequest::new("Connect your wallet to purchase solutions", Info).critical()
            }
            Action::ConnectWallet => return Some(Directive::Call(CollaboratorCall::ConnectWallet)),
            Action::InsufficientFunds => NotificationRequest::new(
                "Insufficient funds. Please add ETH to your wallet",
                Warning,
            )
            .critical(),
            Action::SuggestSkillImprovement { match_score } => NotificationRequest::new(
                format!(
                    "Job match: {match_score:.0}%. Consider improving your skills in the required areas."
                ),
                Info,
            ),
            Action::ShowRecommendations { courses } => {
                if courses.is_empty() {
                    return None;
                }
                NotificationRequest::new(
                    format!("{} courses recommended based on your profile", courses.len()),
                    Success,
                )
            }
            Action::BoostEngagement { suggestions } => {
                if suggestions.is_empty() {
                    return None;
                }
                // Rotate so repeated rounds don't repeat the same tip.
                let pick = &suggestions[self.suggestion_cursor % suggestions.len()];
                self.suggestion_cursor = self.suggestion_cursor.wrapping_add(1);
                NotificationRequest::new(format!("Boost your engagement: {pick}"), Info)
            }
            Action::LeadershipOpportunity => NotificationRequest::new(
                "You're one of our most active members. Consider hosting a community session",
                Success,
            ),
            Action::MaintainEngagement => return None,
            Action::ShowMatches { matches } => {
                if matches.is_empty() {
                    return None;
                }
                NotificationRequest::new(
                    format!("{} potential investors match your startup profile", matches.len()),
                    Success,
                )
                .critical()
            }
            Action::SuggestNavigation(suggestion) => NotificationRequest::new(
                format!(
                    "Consider exploring: {} to {}",
                    suggestion.target, suggestion.goal
                ),
                Info,
            ),
            Action::SuggestProgram { level } => {
                NotificationRequest::new(program_for_level(level), Info)
            }
            Action::SuggestSimilarJobs { category } => {
                return Some(Directive::Call(CollaboratorCall::FindJobs(JobFilters {
                    category: Some(category.clone()),
                    location: None,
                })));
            }
            Action::SuggestConnections { email, user_type } => {
                return Some(Directive::Call(CollaboratorCall::FindConnections {
                    email: email.clone(),
                    user_type: user_type.clone(),
                }));
            }
            Action::Notify {
                message,
                kind,
                critical,
            } => NotificationRequest {
                message: message.clone(),
                kind: *kind,
                critical: *critical,
            },
        };

        Some(Directive::Notify(request))
    }

    /// Empty results produce nothing. Failures produce an error toast only
    /// when configured to; a `manual-connection` fallback names the remedy.
    pub fn on_reply(
        &self,
        reply: &CollaboratorReply,
        patterns: &ErrorPatterns,
    ) -> Option<NotificationRequest> {
        use NotificationKind::*;

        match reply {
            CollaboratorReply::Jobs(Ok(jobs)) if !jobs.is_empty() => Some(NotificationRequest::new(
                format!("{} similar jobs found for your skills", jobs.len()),
                Success,
            )),
            CollaboratorReply::Connections(Ok(people)) if !people.is_empty() => {
                Some(NotificationRequest::new(
                    format!("{} people you may want to connect with", people.len()),
                    Info,
                ))
            }
            CollaboratorReply::Wallet(Ok(true)) => {
                Some(NotificationRequest::new("Wallet connected", Success))
            }
            CollaboratorReply::Wallet(Ok(false)) => Some(NotificationRequest::new(
                "Wallet connection was not completed",
                Warning,
            )),
            CollaboratorReply::Jobs(Ok(_)) | CollaboratorReply::Connections(Ok(_)) => None,
            CollaboratorReply::Jobs(Err(e))
            | CollaboratorReply::Connections(Err(e))
            | CollaboratorReply::Wallet(Err(e)) => {
                if !self.notify_on_failure {
                    return None;
                }
                let message = match patterns.fallback_for(e) {
                    Some("manual-connection") => MANUAL_WALLET_MESSAGE,
                    _ => GENERIC_FAILURE_MESSAGE,
                };
                Some(NotificationRequest::new(message, Error))
            }
        }
    }
}

/// Runs one collaborator call to completion, retrying failures as the
/// matching error pattern allows.
pub async fn perform(
    call: CollaboratorCall,
    collaborators: &Collaborators,
    patterns: &ErrorPatterns,
) -> CollaboratorReply {
    let mut attempt: u32 = 0;
    loop {
        let reply = attempt_call(&call, collaborators).await;
        let retry = reply
            .error()
            .is_some_and(|e| attempt < patterns.retries_for(e));
        if !retry {
            return reply;
        }
        attempt += 1;
        debug!(call = ?call.kind(), attempt, "retrying collaborator call");
        tokio::time::sleep(RETRY_DELAY * attempt).await;
    }
}

async fn attempt_call(call: &CollaboratorCall, collaborators: &Collaborators) -> CollaboratorReply {
    match call {
        CollaboratorCall::FindJobs(filters) => CollaboratorReply::Jobs(
            collaborators
                .jobs
                .get_jobs(filters.clone())
                .await
                .map_err(|e| e.to_string()),
        ),
        CollaboratorCall::FindConnections { email, user_type } => CollaboratorReply::Connections(
            collaborators
                .jobs
                .get_connection_recommendations(email, user_type.as_deref())
                .await
                .map_err(|e| e.to_string()),
        ),
        CollaboratorCall::ConnectWallet => {
            CollaboratorReply::Wallet(collaborators.wallet.init().await.map_err(|e| e.to_string()))
        }
    }
}
