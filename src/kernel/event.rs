use super::action::ActionResult;
use super::dispatcher::CollaboratorReply;
use crate::context::ActivityEvent;
use crate::notify::NotificationId;

/// Inputs delivered to the engine task.
#[derive(Debug, Clone)]
pub enum Event {
    /// Current page changed. Also counts as a page view.
    Navigate(String),
    Activity(ActivityEvent),
    /// User closed a toast.
    Dismiss(NotificationId),
    /// Close whatever toast is visible.
    DismissCurrent,
    /// Action raised outside the inference loop, e.g. by page code.
    Action(ActionResult),
    /// Async collaborator result.
    Reply(CollaboratorReply),
}
