//! Toast notifications: types, the serializing queue and the rendering seam.

mod queue;
mod surface;
mod types;

pub use queue::{DismissReason, NotificationQueue, QueueEffect, QueueFull, QueueState};
pub use surface::{RecordingSurface, SurfaceEvent, ToastSurface, TracingSurface};
pub use types::{
    display_duration, notification_priority, Notification, NotificationId, NotificationKind,
    MAX_PRIORITY,
};
